//! Byte stream to event stream.
//!
//! [`decode_stream`] drives the chunk loop: one read at a time, every
//! complete block drained between reads, and the reader dropped as soon as
//! the terminal event, a read error, an oversized block, cancellation or end
//! of stream is seen.

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use futures_util::stream::{self, StreamExt};
use tracing::Instrument;

use super::decoder::EventDecoder;
use super::events::{StreamEvent, DONE_EVENT};
use crate::cancel::CancelHandle;
use crate::error::StreamError;
use crate::traits::{ByteStream, HttpError};

/// Stream of decoded swap events.
pub type SwapEventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Default cap on undecoded data buffered for one unfinished block.
pub const DEFAULT_MAX_BLOCK_BYTES: usize = 8 * 1024 * 1024;

/// Why the reader was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseReason {
    Done,
    EndOfStream,
    ReadError,
    BlockTooLarge,
    Cancelled,
}

/// Outcome of waiting for the next chunk.
enum Read {
    Chunk(Option<Result<Bytes, HttpError>>),
    Cancelled,
}

struct DecodeLoop {
    /// `None` once the loop is closed
    reader: Option<ByteStream>,
    decoder: EventDecoder,
    /// Events decoded from the last chunk, not yet yielded
    ready: VecDeque<StreamEvent>,
    cancel: CancelHandle,
    max_block_bytes: usize,
    /// Span of the caller that opened the stream
    span: tracing::Span,
    chunks: u64,
}

impl DecodeLoop {
    fn new(reader: ByteStream, cancel: CancelHandle, max_block_bytes: usize) -> Self {
        Self {
            reader: Some(reader),
            decoder: EventDecoder::new(),
            ready: VecDeque::new(),
            cancel,
            max_block_bytes,
            span: tracing::Span::current(),
            chunks: 0,
        }
    }

    /// Decode a chunk, queueing every block it completes.
    ///
    /// Stops at the terminal event; blocks after it are never decoded.
    fn extract(&mut self, chunk: &[u8]) {
        self.chunks += 1;
        self.decoder.push(chunk);

        while let Some(parsed) = self.decoder.next_event() {
            let event = parsed.effective_event();

            if event == DONE_EVENT {
                let payload = parsed.payload;
                self.ready.push_back(StreamEvent::Message {
                    event,
                    payload: payload.clone(),
                });
                self.ready.push_back(StreamEvent::Completed { payload });
                self.close(CloseReason::Done);
                return;
            }

            self.ready.push_back(StreamEvent::Message {
                event,
                payload: parsed.payload,
            });
        }

        let pending = self.decoder.pending_len();
        if pending > self.max_block_bytes {
            tracing::error!(
                pending_bytes = pending,
                limit = self.max_block_bytes,
                "unterminated block exceeds size limit"
            );
            self.close(CloseReason::BlockTooLarge);
            self.ready.push_back(StreamEvent::Failed(StreamError::BlockTooLarge {
                limit: self.max_block_bytes,
            }));
        }
    }

    /// Release the reader. Dropping it cancels the underlying body read.
    fn close(&mut self, reason: CloseReason) {
        if self.reader.take().is_none() {
            return;
        }

        let pending = self.decoder.pending_len();
        if reason == CloseReason::EndOfStream && pending > 0 {
            // An unterminated trailing block is dropped, not dispatched.
            tracing::debug!(pending_bytes = pending, "dropping unterminated trailing data");
        }

        tracing::debug!(
            reason = ?reason,
            chunks = self.chunks,
            blocks = self.decoder.decoded_count(),
            "swap stream closed"
        );
    }

    /// Wait for the next chunk unless cancellation comes first.
    async fn read(&mut self) -> Option<Read> {
        let cancel = self.cancel.clone();
        let reader = self.reader.as_mut()?;

        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => Read::Cancelled,
            next = reader.next() => Read::Chunk(next),
        };
        Some(read)
    }
}

/// Decode a chunked response body into swap events.
///
/// Yields `Message` items in block order. On the terminal `done` event a
/// `Message` for it is followed by `Completed` and the stream ends; a read
/// error yields one `Failed` item and ends. Natural end of the body or
/// cancellation ends the stream with no further item.
///
/// Cancellation also interrupts a read that is waiting for data. Logs from
/// the loop are recorded under the span that is current when this is called.
pub fn decode_stream(reader: ByteStream, cancel: CancelHandle) -> SwapEventStream {
    decode_stream_with_limit(reader, cancel, DEFAULT_MAX_BLOCK_BYTES)
}

/// [`decode_stream`] with a custom cap on a single unterminated block.
///
/// Once more than `max_block_bytes` are buffered without a separator the
/// stream yields `Failed(BlockTooLarge)` and ends.
pub fn decode_stream_with_limit(
    reader: ByteStream,
    cancel: CancelHandle,
    max_block_bytes: usize,
) -> SwapEventStream {
    let state = DecodeLoop::new(reader, cancel, max_block_bytes);

    Box::pin(stream::unfold(state, |mut state| {
        let span = state.span.clone();
        async move {
            loop {
                if let Some(event) = state.ready.pop_front() {
                    return Some((event, state));
                }

                match state.read().await? {
                    Read::Cancelled => {
                        state.close(CloseReason::Cancelled);
                        return None;
                    }
                    Read::Chunk(Some(Ok(chunk))) => state.extract(&chunk),
                    Read::Chunk(Some(Err(err))) => {
                        let err = StreamError::from(err);
                        tracing::error!(error = %err, "swap stream read failed");
                        state.close(CloseReason::ReadError);
                        state.ready.push_back(StreamEvent::Failed(err));
                    }
                    Read::Chunk(None) => state.close(CloseReason::EndOfStream),
                }
            }
        }
        .instrument(span)
    }))
}

/// Stream that yields a single failure.
pub(crate) fn failed_stream(err: StreamError) -> SwapEventStream {
    Box::pin(stream::iter(std::iter::once(StreamEvent::Failed(err))))
}
