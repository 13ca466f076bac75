//! Stock normalization filters.
//!
//! Filters are pure text transforms applied symmetrically to actual and
//! expected content before comparison, so formatting noise (comments,
//! trailing blanks, carriage returns) does not fail a test. Each filter is
//! registered under a stable name resolvable from the CLI and the config
//! file; configured filters compose in the order given.

use once_cell::sync::Lazy;
use regex::Regex;

pub type Filter = fn(&str) -> String;

/// Names accepted by [`by_name`], in registry order.
pub const NAMES: &[&str] = &[
    "strip-comments",
    "strip-trailing-space",
    "strip-carriage-returns",
    "collapse-spaces",
    "drop-blank-lines",
    "rstrip",
];

/// Look up a registered filter by name.
pub fn by_name(name: &str) -> Option<Filter> {
    match name {
        "strip-comments" => Some(strip_comments),
        "strip-trailing-space" => Some(strip_trailing_space),
        "strip-carriage-returns" => Some(strip_carriage_returns),
        "collapse-spaces" => Some(collapse_spaces),
        "drop-blank-lines" => Some(drop_blank_lines),
        "rstrip" => Some(rstrip),
        _ => None,
    }
}

/// Apply `filters` to `text` in order.
pub fn apply_all(filters: &[Filter], text: &str) -> String {
    filters
        .iter()
        .fold(text.to_string(), |text, filter| filter(&text))
}

static COMMENT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[^\n]*\n?").unwrap());
static TRAILING_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"  +").unwrap());
static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\r?\n").unwrap());

/// Remove everything from `#` through the end of the line, newline included.
pub fn strip_comments(text: &str) -> String {
    COMMENT_LINE.replace_all(text, "").into_owned()
}

/// Remove spaces and tabs at the end of each line.
pub fn strip_trailing_space(text: &str) -> String {
    TRAILING_SPACE.replace_all(text, "").into_owned()
}

pub fn strip_carriage_returns(text: &str) -> String {
    text.replace('\r', "")
}

/// Collapse runs of two or more spaces to a single space.
pub fn collapse_spaces(text: &str) -> String {
    SPACE_RUN.replace_all(text, " ").into_owned()
}

pub fn drop_blank_lines(text: &str) -> String {
    BLANK_LINE.replace_all(text, "").into_owned()
}

/// Remove trailing whitespace from the end of the whole text.
pub fn rstrip(text: &str) -> String {
    text.trim_end().to_string()
}
