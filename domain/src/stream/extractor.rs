//! Boundary-tolerant extraction of `"text": "<value>"` fragments.
//!
//! The assistant endpoint streams JSON fragments mixed with framing bytes.
//! [`extract_fragments`] scans a carry buffer for complete occurrences and
//! reports how much of the buffer can be discarded: everything except a tail
//! that could still grow into an occurrence once more bytes arrive.

use regex::Regex;
use std::sync::LazyLock;

/// A complete `"text" : "<escaped value>"` occurrence.
static COMPLETE_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"text"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid fragment pattern")
});

/// A suffix of the buffer that is a proper prefix of an occurrence.
static PARTIAL_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)"(?:t(?:e(?:x(?:t(?:"(?:\s*(?::(?:\s*(?:"(?:[^"\\]|\\.)*\\?)?)?)?)?)?)?)?)?)?\z"#,
    )
    .expect("valid partial fragment pattern")
});

/// Result of scanning a carry buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Unescaped values of every complete occurrence, in order
    pub values: Vec<String>,
    /// Byte offset where the retained tail starts
    pub retain_from: usize,
}

/// Scan `buffer` for complete occurrences.
pub fn extract_fragments(buffer: &str) -> Extraction {
    let mut values = Vec::new();
    let mut consumed = 0;

    for caps in COMPLETE_FRAGMENT.captures_iter(buffer) {
        if let (Some(whole), Some(raw)) = (caps.get(0), caps.get(1)) {
            values.push(unescape(raw.as_str()));
            consumed = whole.end();
        }
    }

    let retain_from = PARTIAL_FRAGMENT
        .find(&buffer[consumed..])
        .map(|m| consumed + m.start())
        .unwrap_or(buffer.len());

    Extraction {
        values,
        retain_from,
    }
}

/// Decode a JSON string body (the part between the quotes).
///
/// Invalid escapes fall back to a lenient decoder so the text is still shown.
pub fn unescape(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| lenient_unescape(raw))
}

fn lenient_unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
