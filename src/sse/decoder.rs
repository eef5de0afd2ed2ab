//! Stateful byte-to-event decoder.
//!
//! Combines streaming UTF-8 decoding, block splitting and block parsing.
//! Bytes go in with [`EventDecoder::push`]; events come out one at a time
//! from [`EventDecoder::next_event`], so the caller can stop right after a
//! terminal event without decoding anything that follows it.

use super::block::parse_block;
use super::buffer::BlockBuffer;
use super::events::ParsedEvent;
use super::utf8::Utf8StreamDecoder;

#[derive(Debug, Default)]
pub struct EventDecoder {
    utf8: Utf8StreamDecoder,
    buffer: BlockBuffer,
    /// Blocks decoded so far
    decoded: u64,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transport chunk.
    pub fn push(&mut self, chunk: &[u8]) {
        self.utf8.decode_into(chunk, self.buffer.tail_mut());
    }

    /// Decode the next complete block, if one is buffered.
    pub fn next_event(&mut self) -> Option<ParsedEvent> {
        let block = self.buffer.next_block()?;
        self.decoded += 1;
        let event = parse_block(&block);
        tracing::debug!(
            block = self.decoded,
            event = %event.event_name,
            "decoded block"
        );
        Some(event)
    }

    /// Push a chunk and drain every complete block it finishes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ParsedEvent> {
        self.push(chunk);
        std::iter::from_fn(|| self.next_event()).collect()
    }

    /// Bytes and text received but not yet part of a complete block.
    pub fn pending_len(&self) -> usize {
        self.buffer.remaining().len() + self.utf8.pending_len()
    }

    /// Number of blocks decoded so far.
    pub fn decoded_count(&self) -> u64 {
        self.decoded
    }
}
