//! swapstream - streaming progress client for garment-swap try-on jobs
//!
//! Sends a subject photo and a clothing item id to the try-on service and
//! decodes the chunked progress response into ordered events, either as a
//! stream of [`sse::StreamEvent`] items or through a [`session::SwapHandler`].

pub mod adapters;
pub mod cancel;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;

pub use cancel::CancelHandle;
pub use config::SessionConfig;
pub use error::{HandlerFault, HandlerResult, StreamError};
pub use models::{SubjectImage, SwapFlow, SwapUpload};
pub use session::{Callbacks, SessionState, StreamSession, SwapHandler};
pub use sse::{StreamEvent, SwapEventStream};
