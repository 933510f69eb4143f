//! Backend selection.
//!
//! The factory resolves which [`FileStorage`] backend a process should use
//! and hands out the instance cached from the first successful resolution.
//! Resolution order:
//!
//! 1. `mode = "mock"` or `mode = "local"` force a backend outright.
//! 2. `mode = "auto"` fetches the configuration endpoint and picks the
//!    remote backend for an `aws` answer, the local backend for `local`.
//! 3. Any resolution failure (endpoint unreachable, malformed answer,
//!    unknown mode) falls back to the injected local backend for that call
//!    so media operations keep working; the next call resolves again.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use encore_shared::StorageSettings;

use super::environment::{StorageKind, WireConfig};
use super::error::StorageError;
use super::local::LocalStorage;
use super::mock::MockStorage;
use super::remote::RemoteStorage;
use super::FileStorage;

/// Resolves and caches the storage backend for this process.
pub struct StorageFactory {
    settings: StorageSettings,
    client: reqwest::Client,
    local: Arc<LocalStorage>,
    backend: OnceCell<Arc<dyn FileStorage>>,
}

impl std::fmt::Debug for StorageFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageFactory")
            .field("mode", &self.settings.mode)
            .field("config_url", &self.settings.config_url)
            .field("resolved", &self.backend.initialized())
            .finish()
    }
}

impl StorageFactory {
    /// Creates a factory over `settings` with `local` as the guaranteed
    /// fallback backend.
    #[must_use]
    pub fn new(settings: StorageSettings, local: Arc<LocalStorage>) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
            local,
            backend: OnceCell::new(),
        }
    }

    /// Returns the backend for this process, resolving it on first use.
    ///
    /// Infallible: a resolution failure degrades to the local backend for
    /// this call. Only a success is cached, so a config endpoint that was
    /// briefly unreachable gets another chance on the next call.
    pub async fn backend(&self) -> Arc<dyn FileStorage> {
        match self.backend.get_or_try_init(|| self.resolve()).await {
            Ok(backend) => Arc::clone(backend),
            Err(e) => {
                warn!(error = %e, "Storage resolution failed, using local backend");
                Arc::clone(&self.local) as Arc<dyn FileStorage>
            }
        }
    }

    /// The injected local backend, regardless of what resolution picked.
    ///
    /// The file-serving route reads through this directly since handle URLs
    /// only ever point at local objects.
    #[must_use]
    pub fn local(&self) -> Arc<LocalStorage> {
        Arc::clone(&self.local)
    }

    async fn resolve(&self) -> Result<Arc<dyn FileStorage>, StorageError> {
        match self.settings.mode.as_str() {
            "mock" => {
                info!("Storage mode forced to mock");
                Ok(Arc::new(MockStorage::new()))
            }
            "local" => {
                info!("Storage mode forced to local");
                Ok(Arc::clone(&self.local) as Arc<dyn FileStorage>)
            }
            "auto" => match self.fetch_kind().await? {
                StorageKind::Local => {
                    info!("Storage resolved to local backend");
                    Ok(Arc::clone(&self.local) as Arc<dyn FileStorage>)
                }
                StorageKind::Remote {
                    region,
                    bucket_name,
                } => {
                    info!(%region, %bucket_name, "Storage resolved to remote backend");
                    Ok(Arc::new(RemoteStorage::new(self.settings.base_url.clone())))
                }
            },
            other => Err(StorageError::configuration_missing(format!(
                "unknown storage mode {other:?}"
            ))),
        }
    }

    /// Fetches the configuration endpoint. Called until a resolution
    /// succeeds and feeds the backend cell.
    async fn fetch_kind(&self) -> Result<StorageKind, StorageError> {
        let response = self.client.get(&self.settings.config_url).send().await?;

        if !response.status().is_success() {
            return Err(StorageError::transport(format!(
                "config endpoint returned status {}",
                response.status()
            )));
        }

        let wire: WireConfig = response.json().await?;
        StorageKind::from_wire(&wire)
    }
}
