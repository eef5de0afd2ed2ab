//! Block decoding: `event:` / `data:` lines into a [`ParsedEvent`].

use serde_json::Value;

use super::events::{ParsedEvent, DEFAULT_EVENT};

/// Classified line of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLine<'a> {
    /// `event: <name>`
    Event(&'a str),
    /// `data: <text>`, with one leading space removed
    Data(&'a str),
    /// Anything else, including `:` comments and `id:` lines
    Other,
}

/// Classify a single line. A trailing `\r` (CRLF framing) is ignored.
pub fn parse_block_line(line: &str) -> BlockLine<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if let Some(rest) = line.strip_prefix("event:") {
        return BlockLine::Event(rest.trim());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        // Only the single space after the colon is framing
        return BlockLine::Data(rest.strip_prefix(' ').unwrap_or(rest));
    }

    BlockLine::Other
}

/// Turn the joined data lines into a payload.
///
/// Empty data is `null`; text that is not valid JSON is wrapped as
/// `{"data": <text>}`.
pub fn parse_payload(data: &str) -> Value {
    if data.is_empty() {
        return Value::Null;
    }

    match serde_json::from_str(data) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "payload is not JSON, wrapping as text");
            serde_json::json!({ "data": data })
        }
    }
}

/// Decode one trimmed block.
pub fn parse_block(block: &str) -> ParsedEvent {
    let mut event_name: Option<&str> = None;
    let mut data_lines: Vec<&str> = Vec::new();

    for line in block.split('\n') {
        match parse_block_line(line) {
            BlockLine::Event(name) => event_name = Some(name),
            BlockLine::Data(data) => data_lines.push(data),
            BlockLine::Other => {}
        }
    }

    let data = data_lines.join("\n");

    ParsedEvent {
        event_name: event_name.unwrap_or(DEFAULT_EVENT).to_string(),
        payload: parse_payload(&data),
    }
}
