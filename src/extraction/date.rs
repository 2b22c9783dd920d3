use chrono::DateTime;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::DateFormatError;

/// Parsed after the weekday prefix is removed
const EMAIL_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S %z";
const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

fn weekday_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?i)(?:mon|tue|wed|thu|fri|sat|sun),\s*").expect("valid weekday prefix regex")
    })
}

fn zone_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("valid zone suffix regex"))
}

/// Normalize an email Date header to "Month DD, YYYY".
///
/// A trailing parenthesized zone name such as " (PDT)" is ignored. The
/// weekday must be present but is not checked against the date. The
/// calendar date is taken in the header's own offset.
pub fn normalize_date(raw: &str) -> Result<String, DateFormatError> {
    let invalid = || DateFormatError {
        input: raw.to_string(),
    };

    let trimmed = zone_suffix_regex().replace(raw.trim(), "");
    let prefix = weekday_prefix_regex().find(&trimmed).ok_or_else(invalid)?;

    let parsed = DateTime::parse_from_str(&trimmed[prefix.end()..], EMAIL_DATE_FORMAT)
        .map_err(|_| invalid())?;

    Ok(parsed.format(DISPLAY_DATE_FORMAT).to_string())
}
