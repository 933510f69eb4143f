//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage key is empty or otherwise unusable.
    #[error("invalid storage path: {0:?}")]
    InvalidPath(String),

    /// Refusing to persist a zero-byte object.
    #[error("refusing to store empty content at {path:?}")]
    EmptyContent {
        /// Target storage path.
        path: String,
    },

    /// The underlying medium rejected the write.
    #[error("write failed for {path:?}: {reason}")]
    WriteFailure {
        /// Target storage path.
        path: String,
        /// Underlying failure description.
        reason: String,
    },

    /// Network or object-store call failed. Surfaced to the caller as-is;
    /// there is no automatic retry.
    #[error("storage transport failure: {0}")]
    Transport(String),

    /// Required configuration (e.g. the role identity) is absent.
    #[error("storage configuration missing: {0}")]
    ConfigurationMissing(String),

    /// A production-only operation was invoked outside production.
    #[error("operation requires the production environment: {0}")]
    EnvironmentMismatch(String),

    /// Object not found. Read paths recover from this with a placeholder
    /// reference instead of surfacing it.
    #[error("object not found: {path}")]
    NotFound {
        /// Storage path that was not found.
        path: String,
    },
}

impl StorageError {
    /// Create a write failure error.
    #[must_use]
    pub fn write_failure(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration-missing error.
    #[must_use]
    pub fn configuration_missing(msg: impl Into<String>) -> Self {
        Self::ConfigurationMissing(msg.into())
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Returns the HTTP status code equivalent for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPath(_) | Self::EmptyContent { .. } => 400,
            Self::EnvironmentMismatch(_) => 403,
            Self::NotFound { .. } => 404,
            Self::WriteFailure { .. } | Self::Transport(_) | Self::ConfigurationMissing(_) => 500,
        }
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                path: err.to_string(),
            },
            opendal::ErrorKind::ConfigInvalid => Self::ConfigurationMissing(err.to_string()),
            _ => Self::Transport(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
