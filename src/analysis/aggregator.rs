//! Result aggregation across files.
//!
//! This module merges per-file loader output into the global history and
//! "other" mappings and keeps the per-run counters.

use crate::models::{HistoryFile, HistoryRecord, OtherFile, OtherRecord};
use crate::parser::{parse_history_file, parse_other_file};
use crate::scanner::DiscoveredFiles;
use std::path::Path;
use tracing::{info, warn};

/// Accumulated results of one run.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    history: HistoryRecord,
    other: OtherRecord,
    history_files: usize,
    other_files: usize,
    history_items: usize,
    failed_files: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a loaded history file. Later files win on identical entries.
    pub fn add_history(&mut self, file: HistoryFile) {
        self.history_items += file.item_count;
        self.history_files += 1;
        self.history.merge(file.record);
    }

    /// Merge a loaded "other" file. Later files win on identical symbols.
    pub fn add_other(&mut self, file: OtherFile) {
        if self.other.insert(file.symbol.clone(), file.details).is_some() {
            info!("Replacing earlier details for symbol '{}'", file.symbol);
        }
        self.other_files += 1;
    }

    /// Note a file that contributed nothing.
    pub fn record_failure(&mut self) {
        self.failed_files += 1;
    }

    pub fn history(&self) -> &HistoryRecord {
        &self.history
    }

    pub fn other(&self) -> &OtherRecord {
        &self.other
    }

    /// History files that loaded successfully.
    pub fn history_files(&self) -> usize {
        self.history_files
    }

    /// "Other" files that loaded successfully.
    pub fn other_files(&self) -> usize {
        self.other_files
    }

    /// Sum of per-file item counts, including entries later overwritten.
    pub fn history_items(&self) -> usize {
        self.history_items
    }

    pub fn failed_files(&self) -> usize {
        self.failed_files
    }
}

/// Load every discovered file in order and merge the results.
///
/// A file that fails to load is logged and skipped; it never stops the run.
pub fn aggregate_files(files: &DiscoveredFiles) -> Aggregator {
    let mut aggregator = Aggregator::new();

    if files.history.is_empty() {
        info!("No history files found to parse.");
    }
    for path in &files.history {
        info!("Parsing history file: {}", path.display());
        match parse_history_file(path) {
            Ok(file) => {
                info!(
                    "  Loaded {} symbols and {} data items from {}",
                    file.symbol_count,
                    file.item_count,
                    file_name(path)
                );
                aggregator.add_history(file);
            }
            Err(e) => {
                warn!("  Failed to parse {} ({}): {}", file_name(path), e.kind(), e);
                aggregator.record_failure();
            }
        }
    }

    if files.other.is_empty() {
        info!("No other JSON files found to parse.");
    }
    for path in &files.other {
        info!("Parsing other JSON file: {}", path.display());
        match parse_other_file(path) {
            Ok(file) => {
                info!(
                    "  Loaded data for symbol '{}' from {}",
                    file.symbol,
                    file_name(path)
                );
                aggregator.add_other(file);
            }
            Err(e) => {
                warn!("  Failed to parse {} ({}): {}", file_name(path), e.kind(), e);
                aggregator.record_failure();
            }
        }
    }

    aggregator
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
