//! Error types for the myFlix client.

use thiserror::Error;

/// The single failure shape surfaced by every client operation.
///
/// Callers are expected to react to all variants the same way (show
/// [`ClientError::message`], leave state alone). The variants only exist so
/// that tests and logs can tell where a failure was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transport failure, non-success response or undecodable payload.
    ///
    /// 4xx and 5xx responses are deliberately not distinguished.
    #[error("{message}")]
    Request { message: String },

    /// A local check failed before any network call was made.
    #[error("{message}")]
    Precondition { message: String },

    /// A favorite toggle for this movie has not settled yet.
    #[error("A favorite change for movie '{movie_id}' is already in progress")]
    ToggleInProgress { movie_id: String },
}

impl ClientError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Request error
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Creates a Precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Creates a ToggleInProgress error
    pub fn toggle_in_progress(movie_id: impl Into<String>) -> Self {
        Self::ToggleInProgress {
            movie_id: movie_id.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_request(&self) -> bool {
        matches!(self, Self::Request { .. })
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }

    pub fn is_toggle_in_progress(&self) -> bool {
        matches!(self, Self::ToggleInProgress { .. })
    }

    /// Human-readable message suitable for a transient notification.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Errors raised by durable key/value storage backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// File locking error
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;
