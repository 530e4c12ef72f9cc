//! Client-side error model for remote calls.

use thiserror::Error;

/// Result type used for every remote-backend operation.
pub type ClientResult<T> = Result<T, BackendError>;

/// Failure of a remote-backend call.
///
/// Keep this focused on the boundary: what the hosted service (or the wire)
/// did wrong. UI policy (which failures are surfaced, swallowed, or
/// defaulted) lives with the callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The auth service rejected a credential or session operation.
    ///
    /// The message is user-facing; login/register forms display it inline.
    #[error("{0}")]
    Auth(String),

    /// The request never completed (connect failure, timeout, DNS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A response body could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// A blob-storage operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The referenced row does not exist.
    #[error("not found")]
    NotFound,
}

impl BackendError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
