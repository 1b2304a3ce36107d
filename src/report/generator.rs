//! Summary report generation.
//!
//! This module renders the aggregated results either as a bounded text
//! summary or as a complete JSON document.

use crate::analysis::Aggregator;
use crate::models::{HistoryRecord, OtherRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Placeholder for sub-fields missing from "other" details.
const MISSING: &str = "N/A";

/// Limits applied to the text summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    /// Symbols listed per section before collapsing to a count.
    pub max_symbols: usize,
    /// Date entries listed per category before collapsing to a count.
    pub max_entries: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            max_symbols: 3,
            max_entries: 2,
        }
    }
}

/// Render the bounded text summary.
pub fn generate_text_report(aggregator: &Aggregator, limits: SummaryLimits) -> String {
    let mut output = String::new();

    output.push_str("\n======= Data Summary =======\n");
    output.push_str(&generate_history_section(aggregator, limits));
    output.push_str(&generate_other_section(aggregator, limits));
    output.push_str("\n==========================\n");

    output
}

fn generate_history_section(aggregator: &Aggregator, limits: SummaryLimits) -> String {
    let history = aggregator.history();
    let mut section = String::new();

    section.push_str("\n--- History Data ---\n");
    section.push_str(&format!(
        "Successfully processed {} history files.\n",
        aggregator.history_files()
    ));
    section.push_str(&format!(
        "Found {} unique symbols in history data, with a total of {} data items (date entries).\n",
        history.symbol_count(),
        aggregator.history_items()
    ));

    let symbols = history.symbols();
    for (i, symbol) in symbols.iter().enumerate() {
        if i >= limits.max_symbols {
            section.push_str(&format!(
                "... and {} more symbols.\n",
                symbols.len() - limits.max_symbols
            ));
            break;
        }

        section.push_str(&format!("\n  Symbol: {}\n", symbol));
        for category in history.categories(symbol) {
            section.push_str(&generate_category_block(history, symbol, category, limits));
        }
    }

    section
}

/// Date-ascending entries of one category, capped at `max_entries`.
fn generate_category_block(
    history: &HistoryRecord,
    symbol: &str,
    category: &str,
    limits: SummaryLimits,
) -> String {
    let mut block = format!("    {}:\n", category);

    let total = history.entries(symbol, category).count();
    for (date, value) in history.entries(symbol, category).take(limits.max_entries) {
        block.push_str(&format!("      {}: {}\n", date, display_value(Some(value))));
    }
    if total > limits.max_entries {
        block.push_str(&format!(
            "      ... and {} more entries for {}.\n",
            total - limits.max_entries,
            category
        ));
    }

    block
}

fn generate_other_section(aggregator: &Aggregator, limits: SummaryLimits) -> String {
    let other = aggregator.other();
    let mut section = String::new();

    section.push_str("\n--- Other JSON Data ---\n");
    section.push_str(&format!(
        "Successfully processed {} other JSON files.\n",
        aggregator.other_files()
    ));
    section.push_str(&format!(
        "Found {} unique symbols in other JSON data.\n",
        other.len()
    ));

    for (i, (symbol, details)) in other.iter().enumerate() {
        if i >= limits.max_symbols {
            section.push_str(&format!(
                "... and {} more symbols.\n",
                other.len() - limits.max_symbols
            ));
            break;
        }

        section.push_str(&format!("\n  Symbol: {}\n", symbol));

        if let Some(summary) = details.get("summaryDetail").and_then(Value::as_object) {
            section.push_str("    Summary Detail:\n");
            section.push_str(&field_line("Previous Close", summary, "previousClose"));
            section.push_str(&field_line("Open", summary, "open"));
            section.push_str(&field_line("Volume", summary, "volume"));
        }
        if let Some(quote) = details.get("quoteType").and_then(Value::as_object) {
            section.push_str("    Quote Type:\n");
            section.push_str(&field_line("Short Name", quote, "shortName"));
            section.push_str(&field_line("Exchange", quote, "exchange"));
        }
    }

    section
}

fn field_line(label: &str, object: &Map<String, Value>, key: &str) -> String {
    format!("      {}: {}\n", label, display_value(object.get(key)))
}

/// Strings print bare, other values as compact JSON.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Full JSON rendering of a run.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub history: HistorySection,
    pub other: OtherSection<'a>,
}

#[derive(Debug, Serialize)]
pub struct HistorySection {
    pub files_processed: usize,
    pub symbols: usize,
    pub items: usize,
    pub data: BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>>,
}

#[derive(Debug, Serialize)]
pub struct OtherSection<'a> {
    pub files_processed: usize,
    pub symbols: usize,
    pub data: &'a OtherRecord,
}

/// Generate a JSON report.
pub fn generate_json_report(aggregator: &Aggregator) -> Result<String> {
    let report = JsonReport {
        generated_at: Utc::now(),
        history: HistorySection {
            files_processed: aggregator.history_files(),
            symbols: aggregator.history().symbol_count(),
            items: aggregator.history_items(),
            data: aggregator.history().to_nested(),
        },
        other: OtherSection {
            files_processed: aggregator.other_files(),
            symbols: aggregator.other().len(),
            data: aggregator.other(),
        },
    };

    serde_json::to_string_pretty(&report).map_err(Into::into)
}

/// Write a rendered report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HistoryFile, HistoryKey, OtherFile};
    use chrono::NaiveDate;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history_file(entries: &[(&str, &str, NaiveDate, Value)]) -> HistoryFile {
        let mut record = HistoryRecord::new();
        for (symbol, category, date, value) in entries {
            record.insert(HistoryKey::new(*symbol, *category, *date), value.clone());
        }
        HistoryFile {
            symbol_count: record.symbol_count(),
            item_count: entries.len(),
            record,
        }
    }

    fn other_file(symbol: &str, details: Value) -> OtherFile {
        OtherFile {
            symbol: symbol.to_string(),
            details: details.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_history_entries_sorted_and_capped() {
        let mut agg = Aggregator::new();
        agg.add_history(history_file(&[
            ("AAPL", "close", date(2023, 1, 3), json!(125.07)),
            ("AAPL", "close", date(2023, 1, 1), json!(150.0)),
            ("AAPL", "close", date(2023, 1, 2), json!(152.5)),
        ]));

        let text = generate_text_report(&agg, SummaryLimits::default());

        assert!(text.contains("Successfully processed 1 history files."));
        assert!(text.contains("Found 1 unique symbols in history data, with a total of 3 data items"));
        assert!(text.contains("  Symbol: AAPL"));
        assert!(text.contains("      2023-01-01: 150.0"));
        assert!(text.contains("      2023-01-02: 152.5"));
        assert!(!text.contains("2023-01-03"));
        assert!(text.contains("... and 1 more entries for close."));

        let first = text.find("2023-01-01").unwrap();
        let second = text.find("2023-01-02").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_symbol_cap() {
        let mut agg = Aggregator::new();
        let entries: Vec<_> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|s| (*s, "close", date(2023, 1, 1), json!(1)))
            .collect();
        agg.add_history(history_file(&entries));

        let text = generate_text_report(&agg, SummaryLimits::default());
        assert!(text.contains("Symbol: C"));
        assert!(!text.contains("Symbol: D"));
        assert!(text.contains("... and 2 more symbols."));
    }

    #[test]
    fn test_custom_limits() {
        let mut agg = Aggregator::new();
        agg.add_history(history_file(&[
            ("AAPL", "close", date(2023, 1, 1), json!(1)),
            ("AAPL", "close", date(2023, 1, 2), json!(2)),
            ("MSFT", "close", date(2023, 1, 1), json!(3)),
        ]));

        let limits = SummaryLimits {
            max_symbols: 1,
            max_entries: 1,
        };
        let text = generate_text_report(&agg, limits);
        assert!(text.contains("... and 1 more entries for close."));
        assert!(text.contains("... and 1 more symbols."));
        assert!(!text.contains("Symbol: MSFT"));
    }

    #[test]
    fn test_other_known_fields() {
        let mut agg = Aggregator::new();
        agg.add_other(other_file(
            "AAPL",
            json!({
                "summaryDetail": {"previousClose": 189.98, "volume": 50123456},
                "quoteType": {"shortName": "Apple Inc."}
            }),
        ));
        agg.add_other(other_file("MSFT", json!({"name": "Microsoft"})));

        let text = generate_text_report(&agg, SummaryLimits::default());

        assert!(text.contains("Successfully processed 2 other JSON files."));
        assert!(text.contains("Found 2 unique symbols in other JSON data."));
        assert!(text.contains("Previous Close: 189.98"));
        assert!(text.contains("Open: N/A"));
        assert!(text.contains("Volume: 50123456"));
        assert!(text.contains("Short Name: Apple Inc."));
        assert!(text.contains("Exchange: N/A"));
        assert!(text.contains("  Symbol: MSFT"));
    }

    #[test]
    fn test_empty_report() {
        let text = generate_text_report(&Aggregator::new(), SummaryLimits::default());
        assert!(text.contains("Successfully processed 0 history files."));
        assert!(text.contains("Found 0 unique symbols in other JSON data."));
        assert!(!text.contains("Symbol:"));
    }

    #[test]
    fn test_generate_json_report() {
        let mut agg = Aggregator::new();
        agg.add_history(history_file(&[("AAPL", "close", date(2023, 1, 1), json!(150.0))]));
        agg.add_other(other_file("AAPL", json!({"name": "Apple Inc."})));

        let json = generate_json_report(&agg).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["history"]["items"], json!(1));
        assert_eq!(parsed["history"]["data"]["AAPL"]["close"]["2023-01-01"], json!(150.0));
        assert_eq!(parsed["other"]["data"]["AAPL"]["name"], json!("Apple Inc."));
        assert!(parsed["generated_at"].is_string());
    }

    #[test]
    fn test_write_report() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("summary.txt");

        write_report("hello", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }
}
