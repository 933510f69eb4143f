//! In-memory mock storage backend.
//!
//! Pure map from path to a synthetic URL plus the stored bytes. Nothing
//! survives a process restart. Used by tests and for ephemeral development
//! without touching the disk.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;

use super::error::StorageError;
use super::{FileStorage, placeholder_url, validate_upload};

#[derive(Debug, Clone)]
struct MockObject {
    url: String,
    mime_type: String,
    content: Bytes,
}

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct MockStorage {
    objects: DashMap<String, MockObject>,
}

impl MockStorage {
    /// Creates an empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored bytes for `path`, if any. Test helper for
    /// round-trip assertions.
    #[must_use]
    pub fn content(&self, path: &str) -> Option<Bytes> {
        self.objects.get(path).map(|o| o.content.clone())
    }

    /// Returns the stored MIME type for `path`, if any.
    #[must_use]
    pub fn mime_type(&self, path: &str) -> Option<String> {
        self.objects.get(path).map(|o| o.mime_type.clone())
    }
}

#[async_trait]
impl FileStorage for MockStorage {
    async fn upload(
        &self,
        content: Bytes,
        mime_type: &str,
        path: &str,
    ) -> Result<String, StorageError> {
        validate_upload(&content, path)?;

        let url = format!("/mock-storage/{}_{path}", Utc::now().timestamp_millis());
        self.objects.insert(
            path.to_string(),
            MockObject {
                url: url.clone(),
                mime_type: mime_type.to_string(),
                content,
            },
        );
        Ok(url)
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        self.objects.remove(path);
        Ok(true)
    }

    async fn get_url(&self, path: &str) -> String {
        self.objects
            .get(path)
            .map_or_else(|| placeholder_url(path), |o| o.url.clone())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut paths: Vec<String> = self
            .objects
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|p| p.starts_with(prefix))
            .collect();
        paths.sort();
        Ok(paths)
    }
}
