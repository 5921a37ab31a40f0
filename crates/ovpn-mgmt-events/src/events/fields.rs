//! Field-level helpers used uniformly by every extractor.
//!
//! None of these can fail: a missing or unparsable field degrades to the
//! zero value of its type.

use std::borrow::Cow;

/// Separator between the tag and the body of a line.
pub const EVENT_SEP: u8 = b':';

/// Separator between positional fields inside a body.
pub const FIELD_SEP: char = ',';

/// Whether `bytes` is a valid tag token: non-empty, ASCII alphanumerics and `_`.
pub fn is_tag(bytes: &[u8]) -> bool {
    !bytes.is_empty()
        && bytes
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}

/// Split `line` once on the first [`EVENT_SEP`], returning `(tag, body)`.
pub fn split_tag(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let idx = line.iter().position(|b| *b == EVENT_SEP)?;
    Some((&line[..idx], &line[idx + 1..]))
}

/// Decode body bytes, replacing invalid UTF-8 with U+FFFD.
pub fn text(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Split a body into its positional fields.
pub fn split_fields(body: &str) -> Vec<&str> {
    body.split(FIELD_SEP).collect()
}

/// Field at `idx`, or an empty string when the body is too short.
pub fn field_or_empty(fields: &[&str], idx: usize) -> String {
    fields.get(idx).map(|s| s.to_string()).unwrap_or_default()
}

/// Field at `idx` parsed as a counter, `0` when absent or not a number.
pub fn field_int_or_zero(fields: &[&str], idx: usize) -> u64 {
    fields.get(idx).map(|s| parse_int_or_zero(s)).unwrap_or(0)
}

/// Parse a decimal counter, `0` on any failure (empty, sign, overflow, junk).
pub fn parse_int_or_zero(s: &str) -> u64 {
    s.parse().unwrap_or(0)
}
