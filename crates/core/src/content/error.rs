//! Content operation errors.

use thiserror::Error;

/// Errors from content operations.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No gallery entry with the given id.
    #[error("media item not found: {0}")]
    MediaNotFound(String),
}
