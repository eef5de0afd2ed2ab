//! Faults raised by caller-supplied handlers.

use std::fmt;

/// Error returned by a [`SwapHandler`](crate::session::SwapHandler) callback.
///
/// Handler faults are logged and swallowed; they never abort the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFault {
    message: String,
}

impl HandlerFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HandlerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler fault: {}", self.message)
    }
}

impl std::error::Error for HandlerFault {}

impl From<String> for HandlerFault {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerFault {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<serde_json::Error> for HandlerFault {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<std::io::Error> for HandlerFault {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Result type for handler callbacks.
pub type HandlerResult = Result<(), HandlerFault>;
