//! Disk-backed local storage backend.
//!
//! Development stand-in for the remote bucket. Objects persist on disk
//! under a configured root: the bytes live at the object path and a JSON
//! sidecar (`<path>.meta`) records the MIME type and timestamps. Upload
//! hands back a transient handle URL that is also cached in a volatile
//! in-process map, so repeat `get_url` calls within one process avoid the
//! disk. The cache is lost on restart; `get_url` regenerates the handle
//! from the persistent record on a miss and degrades to the placeholder
//! when the record itself is gone.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use opendal::{Operator, services};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageError;
use super::{FileStorage, list_keys, placeholder_url, validate_upload};

/// Sidecar suffix for object metadata records.
const META_SUFFIX: &str = ".meta";

/// Persistent record kept alongside each stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Storage path of the object.
    pub path: String,
    /// MIME type supplied at upload.
    pub mime_type: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last write timestamp.
    pub last_modified: DateTime<Utc>,
}

/// Disk-backed storage backend for development.
pub struct LocalStorage {
    op: Operator,
    root: PathBuf,
    // Volatile handle cache; cleared only by process restart.
    url_cache: DashMap<String, String>,
}

impl std::fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStorage")
            .field("root", &self.root)
            .field("cached_urls", &self.url_cache.len())
            .finish()
    }
}

impl LocalStorage {
    /// Creates a local backend rooted at `root`. The directory is created
    /// on first write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigurationMissing` when the root path is
    /// unusable.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let builder = services::Fs::default().root(root.to_str().ok_or_else(|| {
            StorageError::configuration_missing("local storage root is not valid UTF-8")
        })?);

        let op = Operator::new(builder)
            .map_err(|e| StorageError::configuration_missing(e.to_string()))?
            .finish();

        Ok(Self {
            op,
            root,
            url_cache: DashMap::new(),
        })
    }

    /// Root directory this backend persists under.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn meta_path(path: &str) -> String {
        format!("{path}{META_SUFFIX}")
    }

    /// Fresh transient handle for an object. The version tag makes stale
    /// browser caches miss after a re-upload.
    fn handle_url(path: &str) -> String {
        format!("/api/storage/file/{path}?v={}", Uuid::new_v4())
    }

    /// Reads the persisted record and bytes for `path`.
    ///
    /// Used by the file-serving route to dereference handle URLs.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when no object is stored at `path`.
    pub async fn read(&self, path: &str) -> Result<(ObjectRecord, Bytes), StorageError> {
        let buffer = self.op.read(path).await.map_err(|e| match e.kind() {
            opendal::ErrorKind::NotFound => StorageError::not_found(path),
            _ => StorageError::transport(e.to_string()),
        })?;
        let bytes = buffer.to_bytes();

        let record = match self.op.read(&Self::meta_path(path)).await {
            Ok(meta) => serde_json::from_slice(&meta.to_bytes()).unwrap_or_else(|_| {
                ObjectRecord {
                    path: path.to_string(),
                    mime_type: "application/octet-stream".to_string(),
                    size: bytes.len() as u64,
                    last_modified: Utc::now(),
                }
            }),
            // Object written without a sidecar (e.g. dropped into the
            // directory by hand); serve it with a generic type.
            Err(_) => ObjectRecord {
                path: path.to_string(),
                mime_type: "application/octet-stream".to_string(),
                size: bytes.len() as u64,
                last_modified: Utc::now(),
            },
        };

        Ok((record, bytes))
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    async fn upload(
        &self,
        content: Bytes,
        mime_type: &str,
        path: &str,
    ) -> Result<String, StorageError> {
        validate_upload(&content, path)?;

        let record = ObjectRecord {
            path: path.to_string(),
            mime_type: mime_type.to_string(),
            size: content.len() as u64,
            last_modified: Utc::now(),
        };

        self.op
            .write(path, content)
            .await
            .map_err(|e| StorageError::write_failure(path, e.to_string()))?;

        let meta = serde_json::to_vec(&record)
            .map_err(|e| StorageError::write_failure(path, e.to_string()))?;
        self.op
            .write(&Self::meta_path(path), meta)
            .await
            .map_err(|e| StorageError::write_failure(path, e.to_string()))?;

        let url = Self::handle_url(path);
        self.url_cache.insert(path.to_string(), url.clone());
        Ok(url)
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        self.url_cache.remove(path);

        // OpenDAL deletes are idempotent; a missing path is a no-op.
        self.op
            .delete(path)
            .await
            .map_err(|e| StorageError::transport(e.to_string()))?;
        self.op
            .delete(&Self::meta_path(path))
            .await
            .map_err(|e| StorageError::transport(e.to_string()))?;

        Ok(true)
    }

    async fn get_url(&self, path: &str) -> String {
        if let Some(cached) = self.url_cache.get(path) {
            return cached.clone();
        }

        // Cache miss (fresh process): regenerate the handle from the
        // persistent record, or fall back to the placeholder.
        match self.op.exists(path).await {
            Ok(true) => {
                let url = Self::handle_url(path);
                self.url_cache.insert(path.to_string(), url.clone());
                url
            }
            _ => placeholder_url(path),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut paths: Vec<String> = list_keys(&self.op, prefix)
            .await?
            .into_iter()
            .filter(|p| !p.ends_with(META_SUFFIX))
            .collect();
        paths.sort();
        Ok(paths)
    }
}
