//! Analysis modules.
//!
//! Aggregation of loaded result files into run-wide mappings.

pub mod aggregator;

pub use aggregator::*;
