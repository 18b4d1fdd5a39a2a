//! Controller for the credential lifecycle protocols.
//!
//! The configuration moves through three states: unconfigured, running on a
//! root credential, and running on a scoped service account. Upgrading is a
//! one-way step guarded by precondition (a second upgrade fails, it does not
//! no-op), and rotation is only meaningful once the scoped identity exists:
//! a root credential has no service-account identity at the remote end to
//! rotate against.
//!
//! Both protocols call the remote admin API first and persist second. A
//! remote failure therefore leaves the stored configuration untouched; a
//! persistence failure after remote success is surfaced as a storage error
//! and leaves the two sides divergent until an operator intervenes.

use std::sync::Arc;

use tracing::{error, info};

use crate::admin::{AddServiceAccountReq, UpdateServiceAccountReq};
use crate::client::ClientCache;
use crate::config::{ConfigStore, ConfigUpdate, CredentialIntent};
use crate::core::{Result, StateError, UpstreamError};
use crate::utils::generate_secret_access_key;

/// Identity label the engine's service account is created under and rotated
/// against. Fixed for the lifetime of a mount.
pub const SERVICE_ACCOUNT_NAME: &str = "vaultadmin:minio:service-account";

const SERVICE_ACCOUNT_DESCRIPTION: &str =
    "Service account used by the MinIO dynamic secrets engine";

/// Drives the upgrade and rotation protocols against the admin API
pub struct CredentialController {
    store: Arc<ConfigStore>,
    cache: Arc<ClientCache>,
}

impl CredentialController {
    /// Create a controller over the shared store and client cache
    pub fn new(store: Arc<ConfigStore>, cache: Arc<ClientCache>) -> Self {
        Self { store, cache }
    }

    /// Replace the root credential with a scoped service account.
    ///
    /// Creates a service account under the currently configured access key,
    /// then stores the returned key pair and marks the configuration as a
    /// service account. Fails with [`StateError::AlreadyServiceAccount`] if
    /// the upgrade already happened; fails with
    /// [`UpstreamError::CreateServiceAccount`] and leaves the configuration
    /// unmodified if the remote call fails.
    pub async fn upgrade_to_service_account(&self) -> Result<()> {
        let config = self.store.get().await?;

        if config.is_service_account {
            return Err(StateError::AlreadyServiceAccount.into());
        }

        let client = self.cache.get_or_create(&config)?;

        let credential = client
            .create_service_account(AddServiceAccountReq {
                target_user: config.access_key_id.clone(),
                name: SERVICE_ACCOUNT_NAME.to_string(),
                policy: None,
                description: SERVICE_ACCOUNT_DESCRIPTION.to_string(),
            })
            .await
            .map_err(|source| {
                let err = UpstreamError::CreateServiceAccount { source };
                error!(error = %err, "service account creation failed");
                err
            })?;

        info!(
            target_user = %config.access_key_id,
            access_key = %credential.access_key,
            "created scoped service account"
        );

        self.store
            .update(
                &ConfigUpdate {
                    access_key_id: Some(credential.access_key),
                    secret_access_key: Some(credential.secret_key),
                    ..Default::default()
                },
                CredentialIntent::ServiceAccount,
            )
            .await?;

        Ok(())
    }

    /// Replace the service account's secret key with a freshly generated one.
    ///
    /// The new secret is sent to the admin API first and persisted only after
    /// the remote accepted it, so the stored secret is never one the remote
    /// does not know. Fails with [`StateError::NotServiceAccount`] without
    /// any remote call while still on the root credential; fails with
    /// [`UpstreamError::RotateSecret`] and keeps the previous secret if the
    /// remote call fails.
    pub async fn rotate_secret(&self) -> Result<()> {
        let config = self.store.get().await?;

        if !config.is_service_account {
            return Err(StateError::NotServiceAccount.into());
        }

        let new_secret = generate_secret_access_key();
        let client = self.cache.get_or_create(&config)?;

        client
            .update_service_account(
                SERVICE_ACCOUNT_NAME,
                UpdateServiceAccountReq {
                    new_secret_key: new_secret.clone(),
                },
            )
            .await
            .map_err(|source| {
                let err = UpstreamError::RotateSecret { source };
                error!(error = %err, "secret rotation failed");
                err
            })?;

        self.store
            .update(
                &ConfigUpdate {
                    secret_access_key: Some(new_secret),
                    ..Default::default()
                },
                CredentialIntent::Configure,
            )
            .await?;

        info!("rotated service account secret");
        Ok(())
    }
}
