//! Text normalization applied to extracted page text before ranking.

use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Clean raw extracted text: strip tag-shaped substrings, collapse
/// whitespace runs to a single space, trim, and drop non-printable
/// characters. Pure and deterministic.
pub fn clean(raw: &str) -> String {
    let stripped = TAG_REGEX.replace_all(raw, " ");
    let collapsed = WHITESPACE_REGEX.replace_all(&stripped, " ");
    collapsed
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}
