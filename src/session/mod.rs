//! Swap session: request, decode loop, dispatch.
//!
//! A [`StreamSession`] owns the transport and configuration. Each call to
//! [`StreamSession::open`] or [`StreamSession::run`] is one independent
//! swap job with its own decoder and its own cancel handle; nothing is
//! shared between calls.
//!
//! - `open` returns the events as a stream (`Message`* then at most one
//!   `Completed` or `Failed`).
//! - `run` drives the same stream into a [`SwapHandler`] and returns the
//!   terminal [`SessionState`].
//!
//! Both are logged under a `swap_session` span with a fresh `session_id`.

mod handler;
mod state;

pub use handler::{Callbacks, SwapHandler};
pub use state::SessionState;

use futures_util::StreamExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::cancel::CancelHandle;
use crate::config::SessionConfig;
use crate::error::{StreamError, StreamResult};
use crate::models::{SwapFlow, SwapUpload};
use crate::sse::{decode_stream_with_limit, failed_stream, StreamEvent, SwapEventStream};
use crate::traits::{ByteStream, Headers, HttpClient};
use handler::{dispatch_complete, dispatch_error, dispatch_message};

/// Client for garment-swap progress streams.
///
/// # Example
///
/// ```ignore
/// use swapstream::adapters::ReqwestHttpClient;
/// use swapstream::{CancelHandle, SessionConfig, StreamSession};
///
/// let config = SessionConfig::from_env();
/// let session = StreamSession::new(ReqwestHttpClient::from_config(&config)?, config);
///
/// let cancel = CancelHandle::new();
/// let mut events = session.open_with_cancel(&upload, cancel.clone()).await;
/// while let Some(event) = events.next().await {
///     println!("{:?}", event);
/// }
/// ```
pub struct StreamSession<C> {
    client: C,
    config: SessionConfig,
}

impl<C: HttpClient> StreamSession<C> {
    pub fn new(client: C, config: SessionConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Endpoint for a flow.
    pub fn url_for(&self, flow: &SwapFlow) -> String {
        match flow {
            SwapFlow::General => self.config.url_for(&self.config.general_path),
            SwapFlow::Device { .. } => self.config.url_for(&self.config.device_path),
        }
    }

    /// Request headers derived from the configuration.
    pub fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        if let Some(token) = &self.config.bearer_token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        if let Some(role) = &self.config.role {
            headers.insert("X-User-Role".to_string(), role.clone());
        }
        headers
    }

    fn session_span(upload: &SwapUpload) -> tracing::Span {
        tracing::info_span!(
            "swap_session",
            session_id = %Uuid::new_v4(),
            flow = upload.flow.name()
        )
    }

    /// Send the upload and return the response body on a 2xx status.
    async fn connect(&self, upload: &SwapUpload) -> StreamResult<ByteStream> {
        let url = self.url_for(&upload.flow);
        tracing::debug!(
            url = %url,
            item_id = %upload.item_id,
            image_bytes = upload.image.bytes.len(),
            "starting swap request"
        );

        self.client
            .post_multipart_stream(&url, upload.to_form(), &self.headers())
            .await
            .map_err(|err| {
                let err = StreamError::from(err);
                tracing::error!(error = %err, code = err.error_code(), "swap request failed");
                err
            })
    }

    /// Start a swap and return its events as a stream.
    ///
    /// A rejected request yields a single `Failed` item.
    pub async fn open(&self, upload: &SwapUpload) -> SwapEventStream {
        self.open_with_cancel(upload, CancelHandle::new()).await
    }

    /// [`open`](Self::open) with a cancel handle owned by the caller.
    ///
    /// If `cancel` is already set, no request is sent and the stream is
    /// empty. Cancelling later ends the stream, even while it waits for data.
    pub async fn open_with_cancel(&self, upload: &SwapUpload, cancel: CancelHandle) -> SwapEventStream {
        let span = Self::session_span(upload);
        self.open_inner(upload, cancel).instrument(span).await
    }

    async fn open_inner(&self, upload: &SwapUpload, cancel: CancelHandle) -> SwapEventStream {
        if cancel.is_cancelled() {
            tracing::debug!("cancelled before request");
            return Box::pin(futures::stream::empty::<StreamEvent>());
        }

        match self.connect(upload).await {
            Ok(body) => decode_stream_with_limit(body, cancel, self.config.max_block_bytes),
            Err(err) => failed_stream(err),
        }
    }

    /// Start a swap and dispatch its events to `handler`.
    ///
    /// Returns the terminal state. Handler faults never change the outcome.
    pub async fn run<H>(&self, upload: &SwapUpload, handler: &mut H) -> SessionState
    where
        H: SwapHandler + ?Sized,
    {
        self.run_with_cancel(upload, handler, CancelHandle::new()).await
    }

    /// [`run`](Self::run) with a cancel handle owned by the caller.
    ///
    /// A cancelled run returns [`SessionState::Cancelled`] and calls neither
    /// `on_error` nor `on_complete`.
    pub async fn run_with_cancel<H>(
        &self,
        upload: &SwapUpload,
        handler: &mut H,
        cancel: CancelHandle,
    ) -> SessionState
    where
        H: SwapHandler + ?Sized,
    {
        let span = Self::session_span(upload);
        self.run_inner(upload, handler, cancel).instrument(span).await
    }

    async fn run_inner<H>(&self, upload: &SwapUpload, handler: &mut H, cancel: CancelHandle) -> SessionState
    where
        H: SwapHandler + ?Sized,
    {
        let mut state = SessionState::Init;

        if cancel.is_cancelled() {
            state.advance(SessionState::Cancelled);
            return state;
        }

        let body = match self.connect(upload).await {
            Ok(body) => body,
            Err(err) => {
                dispatch_error(handler, &err);
                state.advance(SessionState::Failed);
                return state;
            }
        };
        state.advance(SessionState::Streaming);

        let mut events = decode_stream_with_limit(body, cancel.clone(), self.config.max_block_bytes);
        while let Some(event) = events.next().await {
            match event {
                StreamEvent::Message { event, payload } => {
                    dispatch_message(handler, &event, &payload);
                }
                StreamEvent::Completed { payload } => {
                    dispatch_complete(handler, &payload);
                    state.advance(SessionState::Completed);
                    break;
                }
                StreamEvent::Failed(err) => {
                    dispatch_error(handler, &err);
                    state.advance(SessionState::Failed);
                    break;
                }
            }
        }
        drop(events);

        if state == SessionState::Streaming {
            if cancel.is_cancelled() {
                state.advance(SessionState::Cancelled);
            } else {
                state.advance(SessionState::ClosedNoComplete);
            }
        }

        tracing::info!(outcome = %state, "swap session finished");
        state
    }
}
