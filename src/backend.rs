//! Backend wiring.
//!
//! One [`MinioBackend`] is constructed per mount at host initialization and
//! shared by reference with every request handler. It owns the three
//! long-lived components and exposes the operations the host's dispatch layer
//! routes to; there is no ambient state anywhere else.

use std::sync::Arc;

use crate::client::{AdminClientFactory, ClientCache};
use crate::config::{ConfigStore, ConfigUpdate, CredentialIntent, EngineConfig};
use crate::controller::CredentialController;
use crate::core::Result;
use crate::storage::StorageBackend;

/// Help text for the mount, surfaced by the host alongside the backend
pub const BACKEND_HELP: &str = "\
The minio secrets backend manages the administrative credential used to talk
to a MinIO server: configure it with a root credential, upgrade that
credential to a scoped service account, and rotate the service account's
secret key on demand.";

/// The secrets-engine backend: configuration store, client cache, and
/// credential controller behind the host-facing operations.
pub struct MinioBackend {
    store: Arc<ConfigStore>,
    cache: Arc<ClientCache>,
    controller: CredentialController,
}

impl MinioBackend {
    /// Wire a backend over the host's storage and the embedder's admin client
    /// factory.
    pub fn new(storage: Arc<dyn StorageBackend>, factory: Arc<dyn AdminClientFactory>) -> Self {
        let cache = Arc::new(ClientCache::new(factory));
        let store = Arc::new(ConfigStore::new(storage, Arc::clone(&cache)));
        let controller = CredentialController::new(Arc::clone(&store), Arc::clone(&cache));
        Self {
            store,
            cache,
            controller,
        }
    }

    /// Read the current configuration (defaults if none persisted).
    ///
    /// The returned record includes the active secret key; the host must only
    /// surface it over its sealed response channel.
    pub async fn read_config(&self) -> Result<EngineConfig> {
        self.store.get().await
    }

    /// Merge a partial configuration update. Returns whether anything
    /// changed.
    pub async fn update_config(&self, update: &ConfigUpdate) -> Result<bool> {
        self.store.update(update, CredentialIntent::Configure).await
    }

    /// Delete the configuration entirely, returning the engine to its
    /// unconfigured state.
    pub async fn delete_config(&self) -> Result<()> {
        self.store.delete().await
    }

    /// One-way upgrade from the root credential to a scoped service account.
    pub async fn upgrade_to_service_account(&self) -> Result<()> {
        self.controller.upgrade_to_service_account().await
    }

    /// Rotate the service account's secret key.
    pub async fn rotate_secret(&self) -> Result<()> {
        self.controller.rotate_secret().await
    }

    /// The client cache (for inspection in tests)
    pub fn client_cache(&self) -> &Arc<ClientCache> {
        &self.cache
    }
}
