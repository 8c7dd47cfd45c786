//! Error types for document store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a document store can raise.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// Credentials were missing or rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// No document exists with the requested id.
    #[error("document not found: {id}")]
    NotFound {
        /// Requested document id.
        id: String,
    },

    /// The store did not answer in time.
    #[error("operation timed out")]
    Timeout,

    /// The store rejected a query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// An option had an unusable value.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Document update conflict.
    #[error("document update conflict: {id}")]
    Conflict {
        /// Conflicting document id.
        id: String,
    },

    /// A document or response could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store handle has been closed.
    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates a not-found error for `id`.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates an invalid-option error.
    pub fn invalid_option(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Transport { retryable, .. } => *retryable,
            StoreError::Timeout => true,
            _ => false,
        }
    }

    /// Returns true if the error reports a missing document.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
