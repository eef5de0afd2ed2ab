//! Errors that end a swap progress stream.

use thiserror::Error;

use crate::traits::HttpError;

/// Failure that terminates a session.
///
/// Only transport-level problems end up here. Malformed payloads degrade to
/// wrapped text and handler faults are logged, so neither is a `StreamError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The server answered with a non-2xx status; no decoding was attempted.
    #[error("Server rejected swap request ({status}): {body}")]
    Transport { status: u16, body: String },

    /// Connecting, or reading the response body, failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The request could not be built (bad URL, bad MIME type).
    #[error("Invalid swap request: {message}")]
    InvalidRequest { message: String },

    /// A single block grew past the buffering limit without a separator.
    #[error("Stream block exceeds {limit} bytes")]
    BlockTooLarge { limit: usize },
}

impl StreamError {
    /// Check if retrying the whole swap might succeed.
    ///
    /// Retry is left to the caller; the decoder never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::Transport { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            StreamError::Network { .. } => true,
            StreamError::InvalidRequest { .. } | StreamError::BlockTooLarge { .. } => false,
        }
    }

    /// HTTP status for transport rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            StreamError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Transport { .. } => "E_STREAM_TRANSPORT",
            StreamError::Network { .. } => "E_STREAM_NETWORK",
            StreamError::InvalidRequest { .. } => "E_STREAM_REQUEST",
            StreamError::BlockTooLarge { .. } => "E_STREAM_BLOCK_SIZE",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Transport { status, .. } if *status == 401 || *status == 403 => {
                "You are not signed in or not allowed to start a try-on.".to_string()
            }
            StreamError::Transport { status, .. } => {
                format!("The try-on service rejected the request (HTTP {}).", status)
            }
            StreamError::Network { .. } => {
                "Lost connection to the try-on service. Please try again.".to_string()
            }
            StreamError::InvalidRequest { message } => {
                format!("Could not send the try-on request: {}", message)
            }
            StreamError::BlockTooLarge { .. } => {
                "The try-on service sent a malformed progress stream.".to_string()
            }
        }
    }
}

impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => StreamError::Transport {
                status,
                body: message,
            },
            HttpError::InvalidUrl(message) | HttpError::InvalidRequest(message) => {
                StreamError::InvalidRequest { message }
            }
            other => StreamError::Network {
                message: other.to_string(),
            },
        }
    }
}
