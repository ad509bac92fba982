use serde_json::Value;
use thiserror::Error;

pub const SUMMARY_MAX_CHARS: usize = 50;
const ELLIPSIS: &str = "...";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing text field")]
    MissingText,
}

/// Summary text of a session's first record: `message`, else `content`,
/// whichever is a string.
pub fn parse_first_record_text(line: &str) -> Result<String, ParseError> {
    let value: Value = serde_json::from_str(line.trim())?;
    ["message", "content"]
        .iter()
        .find_map(|field| value.get(*field).and_then(|v| v.as_str()))
        .map(|text| text.to_string())
        .ok_or(ParseError::MissingText)
}

pub fn truncate_summary(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn summary_from_first_line(line: &str) -> Option<String> {
    let text = parse_first_record_text(line).ok()?;
    Some(truncate_summary(&text, SUMMARY_MAX_CHARS))
}
