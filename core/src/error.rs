//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the provider treats "the todo
//! no longer exists" differently from every other failure during a refresh.
//! All other non-success responses land in `Status` carrying the server's
//! error message when the body decodes as one.

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods, transports and `TodoApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404, or a lookup returned no items.
    #[error("todo not found")]
    NotFound,

    /// The server returned a status other than the one the operation expects.
    #[error("[{status}] {message}")]
    Status { status: u16, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request never produced an HTTP response.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}
