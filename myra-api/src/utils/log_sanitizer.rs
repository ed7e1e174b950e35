//! Log sanitization utilities
//!
//! Keeps signatures, API keys and large response bodies out of debug/error logs.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Headers whose values carry credentials.
const SENSITIVE_HEADERS: [&str; 1] = ["authorization"];

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` characters with a suffix
/// indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Header value as it may appear in logs.
///
/// `Authorization` keeps its scheme (`MYRA`) and drops key and signature.
pub fn redact_header<'a>(name: &str, value: &'a str) -> std::borrow::Cow<'a, str> {
    if SENSITIVE_HEADERS
        .iter()
        .any(|sensitive| name.eq_ignore_ascii_case(sensitive))
    {
        let scheme = value.split_whitespace().next().unwrap_or_default();
        format!("{scheme} [redacted]").into()
    } else {
        value.into()
    }
}
