//! Environment-switched file storage for site media.
//!
//! Every backend satisfies the same four-operation [`FileStorage`] contract:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        FileStorage                             │
//! │ upload(bytes, mime, path) -> url │ get_url(path) -> url        │
//! │ delete(path) -> bool             │ list(prefix) -> [path, ...] │
//! ├────────────────────────────────────────────────────────────────┤
//! │ LocalStorage   disk records + volatile handle cache (dev)      │
//! │ MockStorage    in-memory map, synthetic URLs (tests)           │
//! │ RemoteStorage  HTTP calls to the storage proxy (production)    │
//! │ S3Store        the proxy's own bucket operator (server side)   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`StorageFactory`] resolves the deployment environment once per
//! process and hands out the matching backend, falling back to the local
//! backend when resolution fails.

pub mod environment;
mod error;
mod factory;
mod local;
mod mock;
mod remote;
mod s3;

pub use environment::{Environment, StorageKind, WireConfig};
pub use error::StorageError;
pub use factory::StorageFactory;
pub use local::{LocalStorage, ObjectRecord};
pub use mock::MockStorage;
pub use remote::RemoteStorage;
pub use s3::{S3Store, public_object_url};

use async_trait::async_trait;
use bytes::Bytes;

/// The file-storage contract all backends implement.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persists `content` under `path`, overwriting any existing object,
    /// and returns a resolvable reference URL.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` or `StorageError::EmptyContent`
    /// for unusable input, and `StorageError::WriteFailure` or
    /// `StorageError::Transport` when the underlying medium rejects the
    /// write.
    async fn upload(
        &self,
        content: Bytes,
        mime_type: &str,
        path: &str,
    ) -> Result<String, StorageError>;

    /// Removes the object at `path`. Idempotent: deleting a missing path
    /// is a successful no-op returning `true`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Transport` when the underlying call fails.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// Returns a reference URL for `path`. Never fails: unknown paths get
    /// the deterministic placeholder so display code cannot crash on a
    /// miss.
    async fn get_url(&self, path: &str) -> String;

    /// Returns the stored paths starting with `prefix`. An empty prefix
    /// returns every path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Transport` when enumeration fails.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Validates upload input shared by every backend.
///
/// # Errors
///
/// Returns `StorageError::InvalidPath` for an empty or blank key and
/// `StorageError::EmptyContent` for a zero-byte body.
pub fn validate_upload(content: &Bytes, path: &str) -> Result<(), StorageError> {
    if path.trim().is_empty() {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    if content.is_empty() {
        return Err(StorageError::EmptyContent {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Deterministic placeholder reference for a missing object.
///
/// Display code substitutes this for unknown paths instead of failing.
#[must_use]
pub fn placeholder_url(path: &str) -> String {
    format!(
        "/placeholder.svg?height=600&width=600&query={}",
        sanitize_query(path)
    )
}

/// Reduces a path to query-safe characters. Anything outside ASCII
/// alphanumerics, dots, hyphens, and underscores becomes an underscore.
fn sanitize_query(path: &str) -> String {
    path.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Enumerates object keys under `prefix` through an OpenDAL operator.
///
/// OpenDAL lists directories, not arbitrary prefixes, so this walks the
/// deepest directory containing the prefix and filters the results.
pub(crate) async fn list_keys(
    op: &opendal::Operator,
    prefix: &str,
) -> Result<Vec<String>, StorageError> {
    let dir = match prefix.rfind('/') {
        Some(i) => &prefix[..=i],
        None => "/",
    };

    let entries = match op.list_with(dir).recursive(true).await {
        Ok(entries) => entries,
        // A directory that was never written to has no keys under it.
        Err(e) if e.kind() == opendal::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::transport(e.to_string())),
    };

    Ok(entries
        .into_iter()
        .filter(|e| e.metadata().mode().is_file())
        .map(|e| e.path().to_string())
        .filter(|p| p.starts_with(prefix))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upload_rejects_blank_path() {
        let content = Bytes::from_static(b"data");
        assert!(matches!(
            validate_upload(&content, ""),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            validate_upload(&content, "   "),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_validate_upload_rejects_empty_content() {
        assert!(matches!(
            validate_upload(&Bytes::new(), "images/x"),
            Err(StorageError::EmptyContent { .. })
        ));
    }

    #[test]
    fn test_validate_upload_accepts_normal_input() {
        let content = Bytes::from_static(b"\x89PNG");
        assert!(validate_upload(&content, "images/gallery/performances/1").is_ok());
    }

    #[test]
    fn test_placeholder_is_deterministic() {
        let a = placeholder_url("images/gallery/performances/42");
        let b = placeholder_url("images/gallery/performances/42");
        assert_eq!(a, b);
        assert!(a.starts_with("/placeholder.svg?height=600&width=600&query="));
    }

    #[test]
    fn test_placeholder_sanitizes_path() {
        let url = placeholder_url("images/gallery café/1");
        assert_eq!(
            url,
            "/placeholder.svg?height=600&width=600&query=images_gallery_caf__1"
        );
    }
}
