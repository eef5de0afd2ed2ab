//! HTTP client trait abstraction.
//!
//! The swap session only needs one transport operation: a multipart POST
//! whose response body arrives as a stream of byte chunks. Keeping it
//! behind a trait lets tests drive the decoder with scripted chunks.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Response body as a stream of transport chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned an error status; `message` is the response body
    ServerError { status: u16, message: String },
    /// Reading the body failed mid-stream
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Request could not be built
    InvalidRequest(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// One part of a multipart form body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    /// Plain text field
    Text { name: String, value: String },
    /// File upload
    File {
        name: String,
        file_name: String,
        mime_type: String,
        bytes: Bytes,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Transport-neutral multipart form.
///
/// Adapters translate it into their own representation; mocks record it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Bytes,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        });
        self
    }

    /// Look up a text field by name.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Look up a part of any kind by name.
    pub fn part(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|part| part.name() == name)
    }
}

/// Trait for the streaming transport.
///
/// Implementations include the production reqwest-based client and a mock
/// client for testing.
///
/// # Example
///
/// ```ignore
/// use swapstream::traits::{HttpClient, Headers, MultipartForm};
///
/// async fn start<C: HttpClient>(client: &C) -> Result<(), HttpError> {
///     let form = MultipartForm::new().text("item_id", "42");
///     let mut body = client.post_multipart_stream(url, form, &Headers::new()).await?;
///     while let Some(chunk) = body.next().await { /* ... */ }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// POST a multipart form and return the response body as a chunk stream.
    ///
    /// A non-2xx status must fail with [`HttpError::ServerError`] carrying
    /// the full response body text; no stream is returned in that case.
    async fn post_multipart_stream(
        &self,
        url: &str,
        form: MultipartForm,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            HttpError::Timeout("30s".to_string()).to_string(),
            "Request timeout: 30s"
        );
        assert_eq!(
            HttpError::ServerError {
                status: 500,
                message: "Internal Server Error".to_string()
            }
            .to_string(),
            "Server error (500): Internal Server Error"
        );
        assert_eq!(
            HttpError::Io("reset".to_string()).to_string(),
            "IO error: reset"
        );
        assert_eq!(
            HttpError::InvalidUrl("bad".to_string()).to_string(),
            "Invalid URL: bad"
        );
        assert_eq!(
            HttpError::InvalidRequest("mime".to_string()).to_string(),
            "Invalid request: mime"
        );
        assert_eq!(
            HttpError::Other("x".to_string()).to_string(),
            "HTTP error: x"
        );
    }

    #[test]
    fn test_multipart_form_builder() {
        let form = MultipartForm::new()
            .file("image", "me.jpg", "image/jpeg", Bytes::from_static(b"\xFF\xD8"))
            .text("item_id", "42");

        assert_eq!(form.parts.len(), 2);
        assert_eq!(form.text_value("item_id"), Some("42"));
        assert_eq!(form.text_value("image"), None);
        assert!(matches!(
            form.part("image"),
            Some(FormPart::File { file_name, .. }) if file_name == "me.jpg"
        ));
        assert!(form.part("device_id").is_none());
    }
}
