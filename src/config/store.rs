use std::sync::Arc;

use tracing::{debug, error, info};

use crate::client::ClientCache;
use crate::config::{CONFIG_STORAGE_KEY, ConfigUpdate, CredentialIntent, EngineConfig};
use crate::core::{ConfigurationError, Result, StorageError};
use crate::storage::StorageBackend;

/// Owns the persisted configuration record.
///
/// Reads materialize defaults when nothing is stored yet; updates merge only
/// the supplied fields and persist only when something changed; delete removes
/// the record entirely. Every mutation discards the cached admin client so
/// the next access rebuilds one from fresh configuration, regardless of
/// whether the mutated fields affect connectivity.
pub struct ConfigStore {
    storage: Arc<dyn StorageBackend>,
    cache: Arc<ClientCache>,
}

impl ConfigStore {
    /// Create a store over the host's storage backend
    pub fn new(storage: Arc<dyn StorageBackend>, cache: Arc<ClientCache>) -> Self {
        Self { storage, cache }
    }

    /// Current configuration, or defaults if none has been persisted yet.
    ///
    /// Never persists anything itself: the default record only materializes
    /// on disk once a write supplies data.
    pub async fn get(&self) -> Result<EngineConfig> {
        let bytes = match self.storage.get(CONFIG_STORAGE_KEY).await {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(error = %err, "failed to fetch configuration");
                return Err(err.into());
            }
        };

        match bytes {
            None => Ok(EngineConfig::default()),
            Some(bytes) if bytes.is_empty() => Ok(EngineConfig::default()),
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                let err = StorageError::DecodeFailure {
                    key: CONFIG_STORAGE_KEY.to_string(),
                    source,
                };
                error!(error = %err, "stored configuration is not decodable");
                err.into()
            }),
        }
    }

    /// Merge `update` into the current configuration.
    ///
    /// Returns whether anything changed. The merged record is persisted only
    /// if it did. Once the persistence step has resolved, the cached admin
    /// client is discarded whether or not the step succeeded; only a failure
    /// to read the current record skips invalidation.
    pub async fn update(&self, update: &ConfigUpdate, intent: CredentialIntent) -> Result<bool> {
        if update.is_empty() {
            return Err(ConfigurationError::EmptyUpdate.into());
        }

        let mut config = self.get().await?;
        let changed = config.apply(update, intent);

        let persisted = if changed {
            self.persist(&config).await
        } else {
            debug!("update supplied no new values, nothing persisted");
            Ok(())
        };

        self.cache.invalidate();
        persisted?;

        Ok(changed)
    }

    /// Remove the persisted configuration entirely.
    ///
    /// The next [`get`](Self::get) returns defaults. The cached client is
    /// discarded only if the delete itself succeeded.
    pub async fn delete(&self) -> Result<()> {
        self.storage.delete(CONFIG_STORAGE_KEY).await?;
        self.cache.invalidate();
        info!("configuration deleted");
        Ok(())
    }

    async fn persist(&self, config: &EngineConfig) -> Result<()> {
        let bytes = serde_json::to_vec(config).map_err(|source| StorageError::EncodeFailure {
            key: CONFIG_STORAGE_KEY.to_string(),
            source,
        })?;
        self.storage.put(CONFIG_STORAGE_KEY, &bytes).await?;
        info!(
            endpoint = %config.endpoint,
            is_service_account = config.is_service_account,
            "configuration updated"
        );
        Ok(())
    }
}
