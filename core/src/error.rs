//! Error types for the item API client.
//!
//! # Design
//! Every failure is recoverable: the store keeps its prior collection and
//! records the `Display` rendering as its error message. 404 has no variant
//! of its own; callers that care use `is_not_found`.

use thiserror::Error;

/// Errors returned by the client, the transports and the store.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, timeout).
    #[error("transport failed: {0}")]
    TransportError(String),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be decoded into the expected type.
    #[error("decoding failed: {0}")]
    DecodeError(String),

    /// The request payload could not be encoded to JSON.
    #[error("encoding failed: {0}")]
    EncodeError(String),

    /// The draft was rejected before any request was built.
    #[error("invalid item draft: {0}")]
    InvalidDraft(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
