use serde::{Deserialize, Serialize};

use crate::core::SecretValue;

/// Fixed storage key the configuration record is persisted under.
///
/// Exactly one configuration exists per mount; the host should seal-wrap this
/// key if it supports doing so.
pub const CONFIG_STORAGE_KEY: &str = "config/root";

/// The engine's connection configuration.
///
/// A singleton: materialized with safe defaults the first time it is read,
/// mutated only by partial updates, and destroyed only by an explicit delete.
///
/// Two flags track the credential lifecycle. `configured` flips to true the
/// first time any credential field is set and stays true until the record is
/// deleted. `is_service_account` flips to true exactly once, when the upgrade
/// protocol replaces the root credential with a scoped service account, and
/// is likewise only reset by deletion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Network address of the MinIO server, e.g. `minio.local:9000`
    pub endpoint: String,
    /// Access key of the currently active administrative credential
    pub access_key_id: String,
    /// Secret key of the currently active administrative credential
    pub secret_access_key: SecretValue,
    /// Use TLS when connecting to the MinIO server
    pub use_ssl: bool,
    /// True once any credential field has ever been set
    pub configured: bool,
    /// True once the upgrade protocol has replaced the root credential
    pub is_service_account: bool,
}

impl EngineConfig {
    /// First field still missing for admin-client construction, checked in
    /// fixed order: `endpoint`, `access_key_id`, `secret_access_key`.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.endpoint.is_empty() {
            return Some("endpoint");
        }
        if self.access_key_id.is_empty() {
            return Some("access_key_id");
        }
        if self.secret_access_key.is_empty() {
            return Some("secret_access_key");
        }
        None
    }

    /// Merge the supplied fields of `update` into this configuration.
    ///
    /// String fields are trimmed of surrounding whitespace before assignment.
    /// Supplying any of the credential fields marks the engine configured.
    /// A `ServiceAccount` intent marks the credential as a service account;
    /// no intent ever clears that flag, deletion is the only way back.
    ///
    /// Returns whether anything was assigned. A supplied field counts as a
    /// change without comparing against the previous value.
    pub(crate) fn apply(&mut self, update: &ConfigUpdate, intent: CredentialIntent) -> bool {
        let mut changed = false;

        if let Some(endpoint) = &update.endpoint {
            self.endpoint = endpoint.trim().to_string();
            self.configured = true;
            changed = true;
        }
        if let Some(access_key_id) = &update.access_key_id {
            self.access_key_id = access_key_id.trim().to_string();
            self.configured = true;
            changed = true;
        }
        if let Some(secret_access_key) = &update.secret_access_key {
            self.secret_access_key = SecretValue::new(secret_access_key.expose().trim());
            self.configured = true;
            changed = true;
        }
        if let Some(use_ssl) = update.use_ssl {
            self.use_ssl = use_ssl;
            changed = true;
        }

        if intent == CredentialIntent::ServiceAccount {
            self.is_service_account = true;
        }

        changed
    }
}

/// Partial update of [`EngineConfig`].
///
/// One `Option` per settable field: "field not supplied" is first-class and
/// distinct from "field supplied as empty". Unsupplied fields keep their
/// prior values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigUpdate {
    /// New MinIO server endpoint
    pub endpoint: Option<String>,
    /// New access key
    pub access_key_id: Option<String>,
    /// New secret key
    pub secret_access_key: Option<SecretValue>,
    /// New TLS flag
    pub use_ssl: Option<bool>,
}

impl ConfigUpdate {
    /// Whether the update supplies no fields at all
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.access_key_id.is_none()
            && self.secret_access_key.is_none()
            && self.use_ssl.is_none()
    }
}

/// Which credential mode an update is targeting.
///
/// Passed explicitly by the calling operation: plain configuration keeps the
/// current mode, while the upgrade protocol passes [`ServiceAccount`] to mark
/// the stored credential as the scoped one it just created.
///
/// [`ServiceAccount`]: CredentialIntent::ServiceAccount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialIntent {
    /// Plain configuration of endpoint and/or credentials
    Configure,
    /// The stored credential now refers to the engine's service account
    ServiceAccount,
}
