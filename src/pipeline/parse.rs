//! Post-processing of raw provider text

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

/// Leading list markers such as `1.`, `2)`, `3 -`, `-`, `*` or `•`.
/// A marker must be followed by whitespace, so `10-minute` or `2024:` stay.
static ENUMERATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+[.)]|\d+\s+-|[-*•])(?:\s+|$)").expect("valid enumeration pattern")
});

fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .trim()
}

/// Split a list answer into entries: one per non-blank line, with list
/// markers and surrounding quotes removed
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| strip_quotes(&ENUMERATION.replace(line, "")).to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Free-text answers are returned as-is apart from surrounding whitespace
pub fn parse_text(text: &str) -> String {
    text.trim().to_string()
}

/// Titles additionally lose the quotes models like to wrap them in
pub fn parse_title(text: &str) -> String {
    strip_quotes(text).to_string()
}

/// Parse a JSON array, tolerating prose or code fences around it
pub fn parse_json_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, serde_json::Error> {
    let trimmed = text.trim();
    match serde_json::from_str(trimmed) {
        Ok(items) => Ok(items),
        Err(err) => match (trimmed.find('['), trimmed.rfind(']')) {
            (Some(start), Some(end)) if start < end => serde_json::from_str(&trimmed[start..=end]),
            _ => Err(err),
        },
    }
}
