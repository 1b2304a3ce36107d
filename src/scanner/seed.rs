//! Sample result files for trying the parser on an empty directory.

use super::DiscoveredFiles;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn sample_history_files() -> Vec<(&'static str, Value)> {
    vec![
        (
            "dummy_AAPL_history.json",
            json!({
                "close": {
                    "('AAPL', datetime.date(2023, 1, 1))": 150.0,
                    "('AAPL', datetime.date(2023, 1, 2))": 152.5
                },
                "open": {
                    "('AAPL', datetime.date(2023, 1, 1))": 149.0,
                    "('AAPL', datetime.date(2023, 1, 2))": 150.2
                }
            }),
        ),
        (
            "dummy_MSFT_history.json",
            json!({
                "close": {
                    "('MSFT', datetime.date(2023, 1, 1))": 250.0,
                    "('MSFT', datetime.date(2023, 1, XX))": 252.5
                }
            }),
        ),
    ]
}

fn sample_other_files() -> Vec<(&'static str, Value)> {
    vec![
        (
            "dummy_info_AAPL.json",
            json!([["AAPL", {"name": "Apple Inc.", "sector": "Technology"}]]),
        ),
        (
            "dummy_info_INVALID.json",
            json!({"symbol": "INVALID", "data": "WrongStructure"}),
        ),
    ]
}

/// Write sample files for every kind that has none, and add them to `files`.
///
/// Returns how many files were written.
pub fn seed_missing(dir: &Path, files: &mut DiscoveredFiles) -> Result<usize> {
    let mut written = 0;

    if files.history.is_empty() {
        info!(
            "No history files found in {}. Creating dummy files.",
            dir.display()
        );
        written += write_samples(dir, sample_history_files(), &mut files.history)?;
    }

    if files.other.is_empty() {
        info!(
            "No other JSON files found in {}. Creating dummy files.",
            dir.display()
        );
        written += write_samples(dir, sample_other_files(), &mut files.other)?;
    }

    Ok(written)
}

fn write_samples(
    dir: &Path,
    samples: Vec<(&'static str, Value)>,
    into: &mut Vec<PathBuf>,
) -> Result<usize> {
    let mut written = 0;

    for (name, value) in samples {
        let path = dir.join(name);
        let content = serde_json::to_string_pretty(&value)
            .with_context(|| format!("Failed to serialize {}", name))?;

        match std::fs::write(&path, content) {
            Ok(()) => {
                info!("Created dummy file: {}", path.display());
                into.push(path);
                written += 1;
            }
            Err(e) => warn!("Could not create dummy file {}: {}", path.display(), e),
        }
    }

    Ok(written)
}
