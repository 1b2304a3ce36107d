//! Loader for "other" result files shaped `[[symbol, {details}], ...]`.

use super::json::{load_and_validate, type_name};
use crate::errors::LoadError;
use crate::models::OtherFile;
use serde_json::Value;
use std::path::Path;

/// Load one "other" file.
///
/// Only the first element of the outer list and the first two items of that
/// element are looked at.
pub fn parse_other_file(path: &Path) -> Result<OtherFile, LoadError> {
    load_and_validate(path, extract_pair)
}

fn extract_pair(value: Value) -> Result<OtherFile, String> {
    let outer = match value {
        Value::Array(outer) => outer,
        other => return Err(format!("expected a non-empty list, got {}", type_name(&other))),
    };

    let Some(first) = outer.into_iter().next() else {
        return Err("expected a non-empty list, got an empty list".to_string());
    };

    let inner = match first {
        Value::Array(inner) if inner.len() >= 2 => inner,
        Value::Array(inner) => {
            return Err(format!(
                "expected an inner list with at least 2 elements, got {}",
                inner.len()
            ))
        }
        other => {
            return Err(format!(
                "expected an inner list with at least 2 elements, got {}",
                type_name(&other)
            ))
        }
    };

    let mut items = inner.into_iter();
    let (Some(symbol), Some(details)) = (items.next(), items.next()) else {
        return Err("inner list ended early".to_string());
    };

    let symbol = match symbol {
        Value::String(symbol) => symbol,
        other => {
            return Err(format!(
                "expected symbol to be a string, got {}",
                type_name(&other)
            ))
        }
    };

    let details = match details {
        Value::Object(details) => details,
        other => {
            return Err(format!(
                "expected details to be an object, got {}",
                type_name(&other)
            ))
        }
    };

    Ok(OtherFile { symbol, details })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<OtherFile, LoadError> {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("info.json");
        std::fs::write(&path, content).unwrap();
        parse_other_file(&path)
    }

    fn structure_reason(result: Result<OtherFile, LoadError>) -> String {
        match result {
            Err(LoadError::Structure { reason, .. }) => reason,
            other => panic!("expected a structure error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_pair() {
        let file = parse(r#"[["AAPL", {"name": "Apple Inc."}]]"#).unwrap();
        assert_eq!(file.symbol, "AAPL");
        assert_eq!(Value::Object(file.details), json!({"name": "Apple Inc."}));
    }

    #[test]
    fn test_extra_elements_ignored() {
        let file = parse(r#"[["AAPL", {"a": 1}, "extra"], ["MSFT", {"b": 2}]]"#).unwrap();
        assert_eq!(file.symbol, "AAPL");
        assert_eq!(file.details["a"], json!(1));
    }

    #[test]
    fn test_fixture() {
        let file = parse(include_str!("../../fixtures/AAPL_info.json")).unwrap();
        assert_eq!(file.symbol, "AAPL");
        assert_eq!(file.details["quoteType"]["shortName"], json!("Apple Inc."));
    }

    #[test]
    fn test_rejects_top_level_object() {
        let reason = structure_reason(parse(include_str!("../../fixtures/INVALID_info.json")));
        assert!(reason.contains("got object"));
    }

    #[test]
    fn test_rejects_empty_list() {
        let reason = structure_reason(parse("[]"));
        assert!(reason.contains("empty list"));
    }

    #[test]
    fn test_rejects_short_inner_list() {
        let reason = structure_reason(parse(r#"[["AAPL"]]"#));
        assert!(reason.contains("got 1"));
    }

    #[test]
    fn test_rejects_non_list_inner() {
        let reason = structure_reason(parse(r#"["AAPL"]"#));
        assert!(reason.contains("got string"));
    }

    #[test]
    fn test_rejects_non_string_symbol() {
        let reason = structure_reason(parse(r#"[[42, {"name": "x"}]]"#));
        assert!(reason.contains("symbol"));
    }

    #[test]
    fn test_rejects_non_object_details() {
        let reason = structure_reason(parse(r#"[["AAPL", ["name"]]]"#));
        assert!(reason.contains("details"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse("[[\"AAPL\","), Err(LoadError::Malformed { .. })));
    }
}
