//! Mock HTTP client for testing.
//!
//! Returns scripted chunk streams or errors and records every request, so
//! tests can drive the decoder through exact chunk boundaries.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, MultipartForm};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Multipart body
    pub form: MultipartForm,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Fail before any body is streamed (connection error, non-2xx status)
    Error(HttpError),
    /// Stream the given chunks, then end
    Stream(Vec<Bytes>),
    /// Stream the given chunks, then fail the next read
    StreamThenError(Vec<Bytes>, HttpError),
    /// Stream the given chunks, then never deliver another one
    StreamThenStall(Vec<Bytes>),
}

impl MockResponse {
    /// Chunk stream from string slices.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Bytes>,
    {
        MockResponse::Stream(chunks.into_iter().map(Into::into).collect())
    }

    /// Non-2xx response with a text body.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        MockResponse::Error(HttpError::ServerError {
            status,
            message: body.into(),
        })
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use swapstream::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_default_response(MockResponse::chunks([
///     "data: {\"status\":\"queued\"}\n\n",
///     "data: {\"status\":\"done\"}\n\n",
/// ]));
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Chunks handed to the consumer across all streams
    chunks_read: Arc<AtomicUsize>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            chunks_read: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set a response for a specific URL.
    ///
    /// URLs match exactly first, then by prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Number of chunks actually pulled by consumers.
    pub fn chunks_read(&self) -> usize {
        self.chunks_read.load(Ordering::SeqCst)
    }

    fn record_request(&self, url: &str, headers: &Headers, form: MultipartForm) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            form,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }

    fn counted_stream(&self, chunks: Vec<Bytes>, trailing_error: Option<HttpError>) -> ByteStream {
        let counter = Arc::clone(&self.chunks_read);
        let items = chunks
            .into_iter()
            .map(Ok)
            .chain(trailing_error.map(Err));

        let stream = futures::stream::iter(items).map(move |item| {
            counter.fetch_add(1, Ordering::SeqCst);
            item
        });
        Box::pin(stream)
    }

    fn stalling_stream(&self, chunks: Vec<Bytes>) -> ByteStream {
        Box::pin(self.counted_stream(chunks, None).chain(futures::stream::pending()))
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_multipart_stream(
        &self,
        url: &str,
        form: MultipartForm,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request(url, headers, form);

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => Ok(self.counted_stream(chunks, None)),
            Some(MockResponse::StreamThenError(chunks, err)) => {
                Ok(self.counted_stream(chunks, Some(err)))
            }
            Some(MockResponse::StreamThenStall(chunks)) => Ok(self.stalling_stream(chunks)),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(stream: ByteStream) -> Vec<Result<Bytes, HttpError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_stream_chunks() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/swap",
            MockResponse::chunks(["chunk1", "chunk2"]),
        );

        let stream = client
            .post_multipart_stream(
                "https://example.com/swap",
                MultipartForm::new().text("item_id", "1"),
                &Headers::new(),
            )
            .await
            .unwrap();
        let chunks = collect(stream).await;

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], Ok(Bytes::from("chunk1")));
        assert_eq!(client.chunks_read(), 2);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].form.text_value("item_id"), Some("1"));
    }

    #[tokio::test]
    async fn test_stream_then_error() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::StreamThenError(
            vec![Bytes::from("a")],
            HttpError::Io("reset".to_string()),
        ));

        let stream = client
            .post_multipart_stream("https://x/y", MultipartForm::new(), &Headers::new())
            .await
            .unwrap();
        let chunks = collect(stream).await;

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], Err(HttpError::Io("reset".to_string())));
    }

    #[tokio::test]
    async fn test_stream_then_stall() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::StreamThenStall(vec![Bytes::from("a")]));

        let mut stream = client
            .post_multipart_stream("https://x/y", MultipartForm::new(), &Headers::new())
            .await
            .unwrap();

        assert_eq!(stream.next().await, Some(Ok(Bytes::from("a"))));
        let stalled =
            tokio::time::timeout(std::time::Duration::from_millis(20), stream.next()).await;
        assert!(stalled.is_err());
    }

    #[tokio::test]
    async fn test_status_error() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::status(500, "boom"));

        let result = client
            .post_multipart_stream("https://x/y", MultipartForm::new(), &Headers::new())
            .await;

        match result {
            Err(HttpError::ServerError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            _ => panic!("Expected ServerError"),
        }
    }

    #[tokio::test]
    async fn test_prefix_match_and_missing() {
        let client = MockHttpClient::new();
        client.set_response("https://example.com/api", MockResponse::chunks(["x"]));

        assert!(client
            .post_multipart_stream(
                "https://example.com/api/swap",
                MultipartForm::new(),
                &Headers::new()
            )
            .await
            .is_ok());

        let missing = client
            .post_multipart_stream("https://other.com", MultipartForm::new(), &Headers::new())
            .await;
        assert!(matches!(missing, Err(HttpError::Other(_))));
    }

    #[test]
    fn test_clear_requests() {
        let client = MockHttpClient::new();
        client.record_request("https://example.com", &Headers::new(), MultipartForm::new());
        assert_eq!(client.get_requests().len(), 1);

        client.clear_requests();
        assert!(client.get_requests().is_empty());
    }
}
