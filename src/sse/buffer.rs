//! Block accumulation and splitting.
//!
//! Decoded text is appended to a [`BlockBuffer`]; complete blocks are taken
//! from the front once a blank-line separator is present.

const CRLF_SEPARATOR: &str = "\r\n\r\n";
const LF_SEPARATOR: &str = "\n\n";

/// Location of a block separator inside the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separator {
    /// Byte offset where the separator starts
    pub offset: usize,
    /// Separator length in bytes (4 for CRLF, 2 for LF)
    pub len: usize,
}

/// Find the earliest block separator in `text`.
///
/// `\r\n\r\n` wins unless `\n\n` starts strictly earlier.
pub fn find_separator(text: &str) -> Option<Separator> {
    let crlf = text.find(CRLF_SEPARATOR);
    let lf = text.find(LF_SEPARATOR);

    match (crlf, lf) {
        (Some(c), Some(l)) if c <= l => Some(Separator {
            offset: c,
            len: CRLF_SEPARATOR.len(),
        }),
        (_, Some(l)) => Some(Separator {
            offset: l,
            len: LF_SEPARATOR.len(),
        }),
        (Some(c), None) => Some(Separator {
            offset: c,
            len: CRLF_SEPARATOR.len(),
        }),
        (None, None) => None,
    }
}

/// Accumulates decoded text and yields complete, trimmed blocks.
///
/// Everything in the buffer is data that has not been handed out yet.
/// Text already searched for a separator is not searched again, so a block
/// arriving in many small chunks is scanned once.
#[derive(Debug, Default)]
pub struct BlockBuffer {
    text: String,
    /// Length of the prefix known to contain no separator
    scanned: usize,
}

impl BlockBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append decoded text to the tail.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Mutable access to the tail for in-place decoding. Callers only append.
    pub(crate) fn tail_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Offset to resume the separator search from.
    ///
    /// Backs up far enough to catch a separator split across appends.
    fn scan_start(&self) -> usize {
        let mut start = self.scanned.saturating_sub(CRLF_SEPARATOR.len() - 1);
        while !self.text.is_char_boundary(start) {
            start -= 1;
        }
        start
    }

    /// Take the next complete block from the front of the buffer.
    ///
    /// Whitespace-only blocks are skipped. Returns `None` when no separator
    /// remains, leaving the partial block in place.
    pub fn next_block(&mut self) -> Option<String> {
        loop {
            let start = self.scan_start();
            let sep = match find_separator(&self.text[start..]) {
                Some(sep) => sep,
                None => {
                    self.scanned = self.text.len();
                    return None;
                }
            };

            let end = start + sep.offset;
            let block = self.text[..end].trim().to_string();
            self.text.drain(..end + sep.len);
            self.scanned = 0;

            if block.is_empty() {
                tracing::trace!("skipping whitespace-only block");
                continue;
            }
            return Some(block);
        }
    }

    /// Unconsumed text that has not formed a complete block yet.
    pub fn remaining(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.scanned = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_separator_lf_only() {
        assert_eq!(
            find_separator("data: a\n\ndata: b\n\n"),
            Some(Separator { offset: 7, len: 2 })
        );
    }

    #[test]
    fn test_find_separator_crlf_only() {
        assert_eq!(
            find_separator("data: a\r\n\r\n"),
            Some(Separator { offset: 7, len: 4 })
        );
    }

    #[test]
    fn test_find_separator_earlier_lf_wins() {
        // LF block first, CRLF block second
        assert_eq!(
            find_separator("a\n\nb\r\n\r\n"),
            Some(Separator { offset: 1, len: 2 })
        );
    }

    #[test]
    fn test_find_separator_earlier_crlf_wins() {
        assert_eq!(
            find_separator("a\r\n\r\nb\n\n"),
            Some(Separator { offset: 1, len: 4 })
        );
    }

    #[test]
    fn test_find_separator_none() {
        assert_eq!(find_separator("data: partial\r\n\r"), None);
        assert_eq!(find_separator("data: partial\n"), None);
        assert_eq!(find_separator(""), None);
    }

    #[test]
    fn test_next_block_drains_all_complete_blocks() {
        let mut buffer = BlockBuffer::new();
        buffer.push_str("event: a\ndata: 1\n\nevent: b\r\ndata: 2\r\n\r\ndata: tail");

        assert_eq!(buffer.next_block().as_deref(), Some("event: a\ndata: 1"));
        assert_eq!(buffer.next_block().as_deref(), Some("event: b\r\ndata: 2"));
        assert_eq!(buffer.next_block(), None);
        assert_eq!(buffer.remaining(), "data: tail");
    }

    #[test]
    fn test_next_block_skips_whitespace_blocks() {
        let mut buffer = BlockBuffer::new();
        buffer.push_str("\n\n  \n\ndata: x\n\n");

        assert_eq!(buffer.next_block().as_deref(), Some("data: x"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_next_block_waits_for_split_separator() {
        let mut buffer = BlockBuffer::new();
        buffer.push_str("data: x\r\n\r");
        assert_eq!(buffer.next_block(), None);

        buffer.push_str("\n");
        assert_eq!(buffer.next_block().as_deref(), Some("data: x"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_resumed_scan_finds_separator_split_across_pushes() {
        let mut buffer = BlockBuffer::new();
        buffer.push_str("data: one\r");
        assert_eq!(buffer.next_block(), None);
        buffer.push_str("\n\r");
        assert_eq!(buffer.next_block(), None);
        buffer.push_str("\ndata: two\n");
        assert_eq!(buffer.next_block().as_deref(), Some("data: one"));
        assert_eq!(buffer.next_block(), None);
        buffer.push_str("\n");
        assert_eq!(buffer.next_block().as_deref(), Some("data: two"));
    }

    #[test]
    fn test_resumed_scan_keeps_tie_break() {
        // LF separator completes after a CRLF prefix was already scanned
        let mut buffer = BlockBuffer::new();
        buffer.push_str("data: a\r\n");
        assert_eq!(buffer.next_block(), None);
        buffer.push_str("\n\r\n");
        assert_eq!(buffer.next_block().as_deref(), Some("data: a"));
        assert_eq!(buffer.remaining(), "\r\n");
    }

    #[test]
    fn test_resumed_scan_backs_up_to_char_boundary() {
        let mut buffer = BlockBuffer::new();
        buffer.push_str("data: ñ");
        assert_eq!(buffer.next_block(), None);
        buffer.push_str("\n\n");
        assert_eq!(buffer.next_block().as_deref(), Some("data: ñ"));
    }

    #[test]
    fn test_large_block_in_small_pushes() {
        let mut buffer = BlockBuffer::new();
        buffer.push_str("data: ");
        for _ in 0..10_000 {
            buffer.push_str("x");
            assert_eq!(buffer.next_block(), None);
        }
        buffer.push_str("\n\n");
        let block = buffer.next_block().unwrap();
        assert_eq!(block.len(), 6 + 10_000);
    }

    #[test]
    fn test_clear() {
        let mut buffer = BlockBuffer::new();
        buffer.push_str("data: x");
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
