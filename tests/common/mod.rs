//! Common test utilities for integration tests.
//!
//! Fixtures for uploads and sessions, plus helpers that feed byte streams
//! through the decoder with arbitrary chunking.

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use bytes::Bytes;
use futures::StreamExt;
use swapstream::sse::decode_stream;
use swapstream::traits::{ByteStream, HttpError};
use swapstream::{CancelHandle, SessionConfig, StreamEvent, StreamSession, SubjectImage, SwapUpload};

pub const TEST_BASE_URL: &str = "https://tryon.test";

/// A small fake JPEG upload for item `42`.
pub fn test_upload() -> SwapUpload {
    SwapUpload::new(
        SubjectImage::new(Bytes::from_static(b"\xFF\xD8\xFF\xE0fake"), "subject.jpg", "image/jpeg"),
        "42",
    )
}

/// Session over a mock client with a bearer token configured.
pub fn mock_session(client: MockHttpClient) -> StreamSession<MockHttpClient> {
    StreamSession::new(
        client,
        SessionConfig::new(TEST_BASE_URL)
            .with_bearer_token("test-token")
            .with_role("customer"),
    )
}

/// Byte stream yielding the given chunks in order.
pub fn chunk_stream(chunks: Vec<Vec<u8>>) -> ByteStream {
    Box::pin(futures::stream::iter(
        chunks
            .into_iter()
            .map(|chunk| Ok::<_, HttpError>(Bytes::from(chunk))),
    ))
}

/// Decode `chunks` to completion and collect every event.
pub async fn decode_chunks(chunks: Vec<Vec<u8>>) -> Vec<StreamEvent> {
    decode_stream(chunk_stream(chunks), CancelHandle::new())
        .collect()
        .await
}

/// Split `bytes` at the given offsets.
pub fn split_at_offsets(bytes: &[u8], offsets: &[usize]) -> Vec<Vec<u8>> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for &offset in offsets {
        let offset = offset.min(bytes.len());
        if offset > start {
            chunks.push(bytes[start..offset].to_vec());
            start = offset;
        }
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}

/// Split `bytes` into pieces of `size` bytes.
pub fn split_every(bytes: &[u8], size: usize) -> Vec<Vec<u8>> {
    bytes.chunks(size.max(1)).map(<[u8]>::to_vec).collect()
}
