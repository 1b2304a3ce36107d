//! Loader for `*_history.json` files.

use super::json::{load_and_validate, type_name};
use super::key::parse_key;
use crate::errors::LoadError;
use crate::models::{HistoryFile, HistoryKey, HistoryRecord};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Load one history file.
///
/// The top level must be an object of `category -> {raw key -> value}`.
/// Non-object categories and unparseable keys are skipped with a warning;
/// a file that cannot be read or decoded yields an error and no data.
pub fn parse_history_file(path: &Path) -> Result<HistoryFile, LoadError> {
    load_and_validate(path, |value| build_history(path, value))
}

fn build_history(path: &Path, value: Value) -> Result<HistoryFile, String> {
    let categories = match value {
        Value::Object(categories) => categories,
        other => {
            return Err(format!(
                "expected a top-level object, got {}",
                type_name(&other)
            ))
        }
    };

    let mut record = HistoryRecord::new();
    let mut item_count = 0;

    for (category, entries) in categories {
        let entries = match entries {
            Value::Object(entries) => entries,
            other => {
                warn!(
                    "Expected an object for category '{}' in '{}', got {}. Skipping.",
                    category,
                    path.display(),
                    type_name(&other)
                );
                continue;
            }
        };

        for (raw_key, value) in entries {
            match parse_key(&raw_key) {
                Some(key) => {
                    record.insert(HistoryKey::new(key.symbol, category.as_str(), key.date), value);
                    item_count += 1;
                }
                None => {
                    warn!(
                        "Could not parse key '{}' in file '{}'. Skipping this entry.",
                        raw_key,
                        path.display()
                    );
                }
            }
        }
    }

    let symbol_count = record.symbol_count();
    debug!(
        "{}: {} symbols, {} items",
        path.display(),
        symbol_count,
        item_count
    );

    Ok(HistoryFile {
        record,
        symbol_count,
        item_count,
    })
}
