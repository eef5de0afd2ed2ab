//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - streaming multipart POST used by the swap session

pub mod http;

pub use http::{ByteStream, FormPart, Headers, HttpClient, HttpError, MultipartForm};
