//! Result file parsing.
//!
//! History files map categories to `"('SYM', datetime.date(Y, M, D))"` keys;
//! "other" files hold a single `[symbol, details]` pair wrapped in a list.

pub mod history;
pub mod json;
pub mod key;
pub mod other;

pub use history::parse_history_file;
pub use other::parse_other_file;
