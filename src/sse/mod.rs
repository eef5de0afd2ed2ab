//! Incremental decoder for the swap progress stream.
//!
//! The response body is SSE-style framing over a plain POST response:
//! - `event: <name>` - optional event name (default `message`)
//! - `data: <text>` - payload line(s), joined with `\n`
//! - Blank line (`\n\n` or `\r\n\r\n`) - ends the block
//! - Anything else - ignored
//!
//! # Module structure
//! - `utf8` - streaming UTF-8 decoding across chunk boundaries
//! - `buffer` - accumulation and blank-line block splitting
//! - `block` - block line classification and payload parsing
//! - `events` - `ParsedEvent`, effective-event normalization, `StreamEvent`
//! - `decoder` - the combined byte-to-event decoder
//! - `stream` - the async chunk loop with termination handling

mod block;
mod buffer;
mod decoder;
mod events;
mod stream;
mod utf8;

pub use block::{parse_block, parse_block_line, parse_payload, BlockLine};
pub use buffer::{find_separator, BlockBuffer, Separator};
pub use decoder::EventDecoder;
pub use events::{ParsedEvent, StreamEvent, DEFAULT_EVENT, DONE_EVENT};
pub(crate) use stream::failed_stream;
pub use stream::{decode_stream, decode_stream_with_limit, SwapEventStream, DEFAULT_MAX_BLOCK_BYTES};
pub use utf8::Utf8StreamDecoder;
