//! Error types for the compute client.
//!
//! # Design
//! The client performs no local validation or recovery, so the taxonomy is
//! limited to what the transport and the decoders can surface. Non-2xx
//! responses land in `HttpError` with the raw status code and body for
//! debugging; connectivity failures land in `Transport`.

use thiserror::Error;

/// Errors returned by `ComputeClient` parse methods and `Compute` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout,
    /// TLS failure, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The response is valid JSON but not the shape the operation declares.
    #[error("decode failed: {0}")]
    DecodeError(String),

    /// An argument could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
