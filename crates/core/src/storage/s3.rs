//! Server-side S3 bucket store.
//!
//! The bucket half of the remote variant: the storage proxy endpoints use
//! this to perform the actual object-store calls. Credentials come from an
//! assumed role resolved from the environment at request time; nothing is
//! hardcoded and nothing is exposed to callers of the proxy.

use async_trait::async_trait;
use bytes::Bytes;
use opendal::{Operator, services};

use super::environment::{self, StorageKind};
use super::error::StorageError;
use super::{FileStorage, list_keys, validate_upload};

/// Public object URL for a bucket/region/path triple.
#[must_use]
pub fn public_object_url(region: &str, bucket: &str, path: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{path}")
}

/// S3-backed storage used by the proxy endpoints.
pub struct S3Store {
    op: Operator,
    region: String,
    bucket: String,
}

impl std::fmt::Debug for S3Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Store")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl S3Store {
    /// Creates a bucket store with an assumed-role identity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigurationMissing` if the operator cannot
    /// be built from the given parameters.
    pub fn new(
        region: impl Into<String>,
        bucket: impl Into<String>,
        role_arn: &str,
    ) -> Result<Self, StorageError> {
        let region = region.into();
        let bucket = bucket.into();

        let builder = services::S3::default()
            .region(&region)
            .bucket(&bucket)
            .role_arn(role_arn);

        let op = Operator::new(builder)
            .map_err(|e| StorageError::configuration_missing(e.to_string()))?
            .finish();

        Ok(Self { op, region, bucket })
    }

    /// Creates a bucket store from the current environment.
    ///
    /// Re-resolves the environment on every call so a single artifact can
    /// serve both deployments.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::EnvironmentMismatch` outside production and
    /// `StorageError::ConfigurationMissing` when the role identity is
    /// absent.
    pub fn from_environment() -> Result<Self, StorageError> {
        match StorageKind::resolve() {
            StorageKind::Remote {
                region,
                bucket_name,
            } => {
                let role = environment::role_arn()?;
                Self::new(region, bucket_name, &role)
            }
            StorageKind::Local => Err(StorageError::EnvironmentMismatch(
                "bucket storage is only available in production".to_string(),
            )),
        }
    }

    /// Bucket this store writes to.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl FileStorage for S3Store {
    async fn upload(
        &self,
        content: Bytes,
        mime_type: &str,
        path: &str,
    ) -> Result<String, StorageError> {
        validate_upload(&content, path)?;

        self.op
            .write_with(path, content)
            .content_type(mime_type)
            .await
            .map_err(|e| StorageError::write_failure(path, e.to_string()))?;

        Ok(public_object_url(&self.region, &self.bucket, path))
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        self.op
            .delete(path)
            .await
            .map_err(|e| StorageError::transport(e.to_string()))?;
        Ok(true)
    }

    async fn get_url(&self, path: &str) -> String {
        // Public objects: plain bucket/region/path concatenation, no call.
        public_object_url(&self.region, &self.bucket, path)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut paths = list_keys(&self.op, prefix).await?;
        paths.sort();
        Ok(paths)
    }
}
