//! Cached admin client handle.
//!
//! Building an admin client is not assumed safe to race, so the whole
//! check-then-construct sequence runs under one exclusive lock: concurrent
//! first accesses construct exactly one client and all callers observe the
//! same handle. The lock is never held across a remote call; construction
//! only validates configuration and assembles the handle.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::admin::AdminApi;
use crate::config::EngineConfig;
use crate::core::ConfigurationError;

/// Builds a concrete [`AdminApi`] handle from the stored configuration.
///
/// Supplied by the embedder at backend initialization. Invoked only while
/// the cache's lock is held, and only after `endpoint`, `access_key_id`, and
/// `secret_access_key` have been validated non-empty.
pub trait AdminClientFactory: Send + Sync {
    /// Assemble a client for `config`
    fn build(&self, config: &EngineConfig) -> Result<Arc<dyn AdminApi>, ConfigurationError>;
}

impl<F> AdminClientFactory for F
where
    F: Fn(&EngineConfig) -> Result<Arc<dyn AdminApi>, ConfigurationError> + Send + Sync,
{
    fn build(&self, config: &EngineConfig) -> Result<Arc<dyn AdminApi>, ConfigurationError> {
        self(config)
    }
}

/// Single cached admin client handle, guarded by one exclusive lock.
///
/// The handle lives from successful construction until the next configuration
/// mutation, which discards it unconditionally.
pub struct ClientCache {
    factory: Arc<dyn AdminClientFactory>,
    slot: Mutex<Option<Arc<dyn AdminApi>>>,
}

impl ClientCache {
    /// Create an empty cache around the embedder's client factory
    pub fn new(factory: Arc<dyn AdminClientFactory>) -> Self {
        Self {
            factory,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached client, constructing one from `config` if absent.
    ///
    /// Fails with [`ConfigurationError::MissingField`] naming the first of
    /// `endpoint`, `access_key_id`, `secret_access_key` that is empty.
    pub fn get_or_create(
        &self,
        config: &EngineConfig,
    ) -> Result<Arc<dyn AdminApi>, ConfigurationError> {
        let mut slot = self.slot.lock();

        if let Some(client) = slot.as_ref() {
            debug!("reusing cached admin client");
            return Ok(Arc::clone(client));
        }

        if let Some(field) = config.first_missing_field() {
            return Err(ConfigurationError::MissingField { field });
        }

        debug!(endpoint = %config.endpoint, "building admin client from stored configuration");
        let client = self.factory.build(config)?;
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Discard the cached client. Idempotent: clearing an empty cache is a
    /// no-op.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock();
        if slot.take().is_some() {
            debug!("discarded cached admin client");
        }
    }

    /// Whether no client is currently cached
    pub fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }
}
