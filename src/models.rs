//! Data models for result aggregation.
//!
//! History data is keyed by an explicit `(symbol, category, date)` record so
//! that merging is a plain map insert and iteration is already grouped by
//! symbol, then category, then ascending date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A symbol and calendar date decoded from a history key string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedKey {
    /// Ticker or instrument identifier. May be empty.
    pub symbol: String,
    /// Validated calendar date.
    pub date: NaiveDate,
}

/// Identity of one history data point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HistoryKey {
    pub symbol: String,
    /// Data field label such as `close` or `volume`.
    pub category: String,
    pub date: NaiveDate,
}

impl HistoryKey {
    pub fn new(symbol: impl Into<String>, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            category: category.into(),
            date,
        }
    }
}

/// `symbol -> category -> date -> value`, stored flat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryRecord {
    entries: BTreeMap<HistoryKey, Value>,
}

impl HistoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, key: HistoryKey, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    /// Merge another record into this one. Later values win on identical keys.
    pub fn merge(&mut self, other: HistoryRecord) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, symbol: &str, category: &str, date: NaiveDate) -> Option<&Value> {
        self.entries.get(&HistoryKey::new(symbol, category, date))
    }

    /// Number of distinct `(symbol, category, date)` entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct symbols in ascending order.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = Vec::new();
        for key in self.entries.keys() {
            if symbols.last() != Some(&key.symbol.as_str()) {
                symbols.push(&key.symbol);
            }
        }
        symbols
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols().len()
    }

    /// Distinct categories recorded for a symbol, in ascending order.
    pub fn categories(&self, symbol: &str) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for key in self.entries.keys().filter(|k| k.symbol == symbol) {
            if categories.last() != Some(&key.category.as_str()) {
                categories.push(&key.category);
            }
        }
        categories
    }

    /// Date-ordered entries for one symbol and category.
    pub fn entries<'a>(
        &'a self,
        symbol: &str,
        category: &str,
    ) -> impl Iterator<Item = (NaiveDate, &'a Value)> + 'a {
        let start = HistoryKey::new(symbol, category, NaiveDate::MIN);
        let end = HistoryKey::new(symbol, category, NaiveDate::MAX);
        self.entries.range(start..=end).map(|(k, v)| (k.date, v))
    }

    /// Nested view keyed by ISO date strings, for serialization.
    pub fn to_nested(&self) -> BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>> {
        let mut nested: BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>> =
            BTreeMap::new();

        for (key, value) in &self.entries {
            nested
                .entry(key.symbol.clone())
                .or_default()
                .entry(key.category.clone())
                .or_default()
                .insert(key.date.format("%Y-%m-%d").to_string(), value.clone());
        }

        nested
    }
}

/// `symbol -> details` collected from "other" result files.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OtherRecord {
    entries: BTreeMap<String, Map<String, Value>>,
}

impl OtherRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert details for a symbol, returning the details it replaced.
    pub fn insert(
        &mut self,
        symbol: impl Into<String>,
        details: Map<String, Value>,
    ) -> Option<Map<String, Value>> {
        self.entries.insert(symbol.into(), details)
    }

    pub fn get(&self, symbol: &str) -> Option<&Map<String, Value>> {
        self.entries.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Map<String, Value>)> {
        self.entries.iter()
    }
}

/// Contribution of one successfully loaded history file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFile {
    pub record: HistoryRecord,
    /// Distinct symbols seen in this file only.
    pub symbol_count: usize,
    /// Keys that parsed and were recorded.
    pub item_count: usize,
}

/// Contribution of one successfully loaded "other" file.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherFile {
    pub symbol: String,
    pub details: Map<String, Value>,
}
