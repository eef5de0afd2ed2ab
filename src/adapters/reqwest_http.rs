//! Reqwest-based HTTP client adapter.
//!
//! Production implementation of the [`HttpClient`] trait from `crate::traits`.

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::config::SessionConfig;
use crate::traits::{ByteStream, FormPart, Headers, HttpClient, HttpError, MultipartForm};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use swapstream::adapters::ReqwestHttpClient;
///
/// let client = ReqwestHttpClient::from_config(&config)?;
/// let session = StreamSession::new(client, config);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client honouring the timeouts in `config`.
    ///
    /// The overall request timeout also bounds how long the progress stream
    /// may stay open, so it is usually left unset for swap jobs.
    pub fn from_config(config: &SessionConfig) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Self::convert_error)?;
        Ok(Self { client })
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidRequest(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert a body read error to HttpError.
    fn convert_read_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else {
            HttpError::Io(err.to_string())
        }
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }

    /// Translate the transport-neutral form into a reqwest form.
    fn build_form(form: MultipartForm) -> Result<reqwest::multipart::Form, HttpError> {
        let mut out = reqwest::multipart::Form::new();
        for part in form.parts {
            out = match part {
                FormPart::Text { name, value } => out.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    mime_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes.to_vec())
                        .file_name(file_name)
                        .mime_str(&mime_type)
                        .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
                    out.part(name, part)
                }
            };
        }
        Ok(out)
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_multipart_stream(
        &self,
        url: &str,
        form: MultipartForm,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        let form = Self::build_form(form)?;

        let builder = self.client.post(parsed).multipart(form);
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            // A body that cannot be read is a network failure, not a rejection
            let message = response.text().await.map_err(Self::convert_read_error)?;
            return Err(HttpError::ServerError { status, message });
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(Self::convert_read_error));

        Ok(Box::pin(stream))
    }
}
