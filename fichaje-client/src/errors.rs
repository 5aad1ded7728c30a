//! Session client error types
//!
//! Provides error handling for authenticated-request operations using
//! thiserror for proper error trait implementations.

use thiserror::Error;

use crate::store::StoreError;
use crate::transport::TransportError;

/// Main session client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Login rejected and the server supplied no message
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No access token is stored; the caller must log in first
    #[error("not authenticated")]
    NotAuthenticated,

    /// Access token expired and could not be refreshed
    #[error("session expired")]
    SessionExpired,

    /// Transport-level failure (connection, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// Response body was not the JSON shape the endpoint promises
    #[error("malformed response body: {0}")]
    Protocol(#[from] serde_json::Error),

    /// Business error reported by the API, surfaced verbatim
    #[error("{0}")]
    Api(String),

    /// Credential store read or write failed
    #[error("credential store error: {0}")]
    Storage(#[from] StoreError),
}

/// Result type alias for session client operations
pub type ClientResult<T> = Result<T, ClientError>;
