//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - scripted chunk streams and transport errors

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
