//! Error types for the media server client.

use thiserror::Error;
use vireo_core::types::ItemId;

/// Errors that can occur when talking to a Vireo media server.
#[derive(Error, Debug)]
pub enum ServerClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Requested item does not exist on the server
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// Authentication required but no token available (or rejected)
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl From<ServerClientError> for vireo_core::CoreError {
    fn from(err: ServerClientError) -> Self {
        match err {
            ServerClientError::NotFound(id) => vireo_core::CoreError::ItemNotFound(id),
            ServerClientError::InvalidUrl(msg) => vireo_core::CoreError::invalid_input(msg),
            other => vireo_core::CoreError::network(other.to_string()),
        }
    }
}

/// Result type for server client operations.
pub type Result<T> = std::result::Result<T, ServerClientError>;
