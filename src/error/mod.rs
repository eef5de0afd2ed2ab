//! Error types for swap streaming.
//!
//! - [`StreamError`]: transport and network failures that end a session
//!   (reported once through `on_error` or a `Failed` item)
//! - [`HandlerFault`]: errors returned by caller callbacks, logged and
//!   swallowed by the dispatcher
//!
//! The collaborator-level [`HttpError`](crate::traits::HttpError) converts
//! into `StreamError`.

mod handler;
mod stream;

pub use handler::{HandlerFault, HandlerResult};
pub use stream::StreamError;

/// Type alias for Results using StreamError.
pub type StreamResult<T> = Result<T, StreamError>;
