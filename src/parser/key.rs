//! Decoding of `('SYMBOL', datetime.date(Y, M, D))` history keys.

use crate::models::ParsedKey;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Latest year a key may carry.
const MAX_YEAR: i32 = 9999;

fn history_key_re() -> &'static Regex {
    static HISTORY_KEY_RE: OnceLock<Regex> = OnceLock::new();
    HISTORY_KEY_RE.get_or_init(|| {
        Regex::new(
            r"^\s*\(\s*'(?P<symbol>[^']*)'\s*,\s*(?:datetime\.)?date\s*\(\s*(?P<year>[0-9]+)\s*,\s*(?P<month>[0-9]{1,2})\s*,\s*(?P<day>[0-9]{1,2})\s*\)\s*\)\s*$",
        )
        .expect("valid history key regex")
    })
}

/// Parse a raw history key into its symbol and date.
///
/// Returns `None` when the key does not have the expected shape or when its
/// components do not form a real calendar date. Never yields a partial key.
pub fn parse_key(raw: &str) -> Option<ParsedKey> {
    let caps = history_key_re().captures(raw)?;

    let year_str = &caps["year"];
    let month_str = &caps["month"];
    let day_str = &caps["day"];

    let date = build_date(year_str, month_str, day_str);
    if date.is_none() {
        warn!(
            "Invalid date components in key '{}': year={}, month={}, day={}",
            raw, year_str, month_str, day_str
        );
    }

    Some(ParsedKey {
        symbol: caps["symbol"].to_string(),
        date: date?,
    })
}

fn build_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    if !(1..=MAX_YEAR).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}
