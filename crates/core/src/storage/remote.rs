//! Remote storage backend.
//!
//! Delegates every operation over HTTP to the storage proxy endpoints so
//! cloud credentials never leave the server side. On `get_url` proxy
//! failure it degrades to the same-origin file-serving path instead of
//! erroring, since display code must keep working through an outage.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::warn;

use super::error::StorageError;
use super::{FileStorage, validate_upload};

#[derive(Debug, Deserialize)]
struct UrlResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct FilesResponse {
    files: Vec<String>,
}

/// Storage backend that talks to the storage proxy over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteStorage {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteStorage {
    /// Creates a remote backend against the proxy at `base_url`
    /// (e.g. `https://example.com`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl FileStorage for RemoteStorage {
    async fn upload(
        &self,
        content: Bytes,
        mime_type: &str,
        path: &str,
    ) -> Result<String, StorageError> {
        validate_upload(&content, path)?;

        let part = reqwest::multipart::Part::bytes(content.to_vec())
            .file_name("file")
            .mime_str(mime_type)
            .map_err(|e| StorageError::transport(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("path", path.to_string());

        let response = self
            .client
            .post(self.endpoint("/api/storage/upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::transport(format!(
                "upload failed with status {}",
                response.status()
            )));
        }

        let body: UrlResponse = response.json().await?;
        Ok(body.url)
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let response = self
            .client
            .delete(self.endpoint("/api/storage/delete"))
            .json(&serde_json::json!({ "path": path }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::transport(format!(
                "delete failed with status {}",
                response.status()
            )));
        }

        Ok(true)
    }

    async fn get_url(&self, path: &str) -> String {
        let result = async {
            let response = self
                .client
                .get(self.endpoint("/api/storage/getUrl"))
                .query(&[("path", path)])
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(StorageError::transport(format!(
                    "getUrl failed with status {}",
                    response.status()
                )));
            }

            let body: UrlResponse = response.json().await?;
            Ok::<_, StorageError>(body.url)
        }
        .await;

        match result {
            Ok(url) => url,
            Err(e) => {
                warn!(path = %path, error = %e, "Proxy getUrl failed, using same-origin fallback");
                format!("/api/storage/file/{path}")
            }
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let response = self
            .client
            .get(self.endpoint("/api/storage/list"))
            .query(&[("prefix", prefix)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::transport(format!(
                "list failed with status {}",
                response.status()
            )));
        }

        let body: FilesResponse = response.json().await?;
        Ok(body.files)
    }
}
