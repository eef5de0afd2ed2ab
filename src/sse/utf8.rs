//! Incremental UTF-8 decoding for chunked byte streams.
//!
//! Transport chunk boundaries are arbitrary, so a multi-byte character may
//! arrive split across two reads. The decoder holds back an incomplete
//! trailing sequence until the bytes that complete it show up.

/// Replacement emitted for byte sequences that can never become valid UTF-8.
const REPLACEMENT: char = '\u{FFFD}';

/// Streaming UTF-8 decoder.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    /// Bytes of an incomplete character carried over from the previous chunk (at most 3)
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, appending the text that is complete so far to `out`.
    ///
    /// Invalid sequences are replaced with U+FFFD. A truncated sequence at
    /// the end of the chunk is kept until the next call.
    pub fn decode_into(&mut self, chunk: &[u8], out: &mut String) {
        let owned;
        let mut input: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            self.pending.extend_from_slice(chunk);
            owned = std::mem::take(&mut self.pending);
            &owned
        };

        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    out.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    // Safe: `valid_up_to` marks the end of a verified prefix.
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());

                    match err.error_len() {
                        Some(bad) => {
                            out.push(REPLACEMENT);
                            input = &rest[bad..];
                        }
                        None => {
                            self.pending.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Convenience wrapper around [`decode_into`](Self::decode_into).
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut out = String::with_capacity(chunk.len());
        self.decode_into(chunk, &mut out);
        out
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
