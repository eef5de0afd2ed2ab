//! Event types produced by the swap progress stream.

use serde_json::Value;

use crate::error::StreamError;

/// Event name used when a block carries no `event:` line.
pub const DEFAULT_EVENT: &str = "message";

/// Effective event name that ends a session.
pub const DONE_EVENT: &str = "done";

/// One decoded block: its event name and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvent {
    /// Name from the last `event:` line, or [`DEFAULT_EVENT`]
    pub event_name: String,
    /// JSON payload; `{"data": ...}` for non-JSON text, `null` without data lines
    pub payload: Value,
}

impl ParsedEvent {
    pub fn new(event_name: impl Into<String>, payload: Value) -> Self {
        Self {
            event_name: event_name.into(),
            payload,
        }
    }

    /// Name used for dispatch.
    ///
    /// A default-named event whose payload is an object with a `status`
    /// field takes the status as its name. String statuses are used as-is,
    /// numbers and booleans by their JSON text. A `null` or empty status
    /// leaves the name unchanged.
    pub fn effective_event(&self) -> String {
        if self.event_name != DEFAULT_EVENT {
            return self.event_name.clone();
        }

        match self.payload.get("status") {
            Some(Value::String(status)) if !status.is_empty() => status.clone(),
            Some(status @ (Value::Number(_) | Value::Bool(_))) => status.to_string(),
            _ => self.event_name.clone(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.effective_event() == DONE_EVENT
    }
}

/// Item yielded by a swap event stream.
///
/// A stream yields any number of `Message` items followed by at most one
/// `Completed` or `Failed` item, after which it ends.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A decoded block, named by its effective event
    Message { event: String, payload: Value },
    /// The terminal `done` block was seen; carries its payload
    Completed { payload: Value },
    /// The transport failed; no further items follow
    Failed(StreamError),
}

impl StreamEvent {
    /// Whether this item ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed { .. } | StreamEvent::Failed(_))
    }
}
