//! Field sanitizer for tab-separated output.
//!
//! Every free-text field goes through [`sanitize`] before it is written, so
//! no cell can contain the column delimiter or a line break. The function is
//! pure, total and idempotent.

use std::sync::LazyLock;

use regex::Regex;

/// Normalize `text` into a single-line TSV-safe value.
///
/// Tabs, carriage returns and line feeds become spaces, every run of two or
/// more spaces collapses to one, and surrounding whitespace is trimmed.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let result = flatten_breaks(text);
    let result = collapse_spaces(&result);
    result.trim().to_string()
}

// ---------------------------------------------------------------------------
// Pass 1: delimiter and line breaks
// ---------------------------------------------------------------------------

fn flatten_breaks(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' | '\r' | '\n' => ' ',
            c => c,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pass 2: space runs
// ---------------------------------------------------------------------------

/// Collapse maximal runs of spaces in one pass.
fn collapse_spaces(text: &str) -> String {
    static SPACE_RUN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r" {2,}").expect("valid regex"));

    SPACE_RUN_RE.replace_all(text, " ").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
