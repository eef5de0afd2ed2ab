//! Session configuration.
//!
//! Everything a swap session needs to know about where and as whom to
//! connect is passed in explicitly; nothing is read from shared state at
//! request time.

use std::time::Duration;

use crate::sse::DEFAULT_MAX_BLOCK_BYTES;

/// Default API base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Route of the general swap flow.
pub const DEFAULT_GENERAL_PATH: &str = "/api/tryon/swap/stream";

/// Route of the device (kiosk camera) swap flow.
pub const DEFAULT_DEVICE_PATH: &str = "/api/tryon/device/swap/stream";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`StreamSession`](crate::session::StreamSession).
///
/// Use the builder methods to customize it.
///
/// # Example
///
/// ```ignore
/// use swapstream::config::SessionConfig;
///
/// let config = SessionConfig::new("https://tryon.example.com")
///     .with_bearer_token("eyJhbGciOi...")
///     .with_role("customer");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Bearer token sent as `Authorization: Bearer <token>`
    pub bearer_token: Option<String>,
    /// Caller role sent as `X-User-Role`
    pub role: Option<String>,
    /// Route for the general flow
    pub general_path: String,
    /// Route for the device flow
    pub device_path: String,
    /// Overall request timeout (covers the whole stream; unset by default)
    pub request_timeout: Option<Duration>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Largest unterminated block buffered before the stream fails
    pub max_block_bytes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: None,
            role: None,
            general_path: DEFAULT_GENERAL_PATH.to_string(),
            device_path: DEFAULT_DEVICE_PATH.to_string(),
            request_timeout: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_block_bytes: DEFAULT_MAX_BLOCK_BYTES,
        }
    }
}

impl SessionConfig {
    /// Create a config for the given base URL with default routes.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_general_path(mut self, path: impl Into<String>) -> Self {
        self.general_path = path.into();
        self
    }

    pub fn with_device_path(mut self, path: impl Into<String>) -> Self {
        self.device_path = path.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_block_bytes(mut self, max: usize) -> Self {
        self.max_block_bytes = max;
        self
    }

    /// Create config from environment variables.
    ///
    /// - `SWAPSTREAM_API_URL` - base URL (default `http://localhost:8000`)
    /// - `SWAPSTREAM_TOKEN` - bearer token
    /// - `SWAPSTREAM_ROLE` - caller role
    /// - `SWAPSTREAM_TIMEOUT_SECS` - overall request timeout; ignored if not a number
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SWAPSTREAM_API_URL") {
            config = config.with_base_url(url);
        }
        if let Ok(token) = std::env::var("SWAPSTREAM_TOKEN") {
            if !token.is_empty() {
                config = config.with_bearer_token(token);
            }
        }
        if let Ok(role) = std::env::var("SWAPSTREAM_ROLE") {
            if !role.is_empty() {
                config = config.with_role(role);
            }
        }
        if let Ok(secs) = std::env::var("SWAPSTREAM_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => config = config.with_request_timeout(Duration::from_secs(secs)),
                Err(_) => tracing::warn!(value = %secs, "ignoring invalid SWAPSTREAM_TIMEOUT_SECS"),
            }
        }

        config
    }

    /// Full URL for a route path.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
