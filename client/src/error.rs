//! Errors returned by `TodoClient` parse and build methods.
//!
//! `NotFound` gets its own variant because callers routinely branch on it.
//! Capacity and validation failures arrive as `HttpError` with status 400 and
//! the server's JSON error body.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("resource not found")]
    NotFound,

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}
