//! Marker file payload handling.
//!
//! Marker files carry a single line of the form
//! `key1=timestampMillis&key2=value&...`. Only the value of the first
//! `=`-pair in the first `&`-field is consumed.

/// Cut `text` at the first line terminator (`\n`, `\r\n` or a lone `\r`).
pub fn first_line(text: &str) -> &str {
    match text.find(|c: char| c == '\n' || c == '\r') {
        Some(end) => &text[..end],
        None => text,
    }
}

/// Extract the producer's timestamp (epoch millis) from marker contents.
///
/// Returns `None` for absent contents, missing delimiters or a non-numeric
/// value. Never fails louder than that: a malformed marker must not stop a
/// scan.
pub fn extract_inner_timestamp(contents: Option<&str>) -> Option<i64> {
    let first_field = contents?.split('&').next()?;
    let value = first_field.split('=').nth(1)?;
    value.parse::<i64>().ok()
}
