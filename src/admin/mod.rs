//! Remote administrative API boundary.
//!
//! The engine consumes exactly two operations of the MinIO admin API:
//! creating a scoped service account and replacing a service account's secret
//! key. Both are synchronous request/response calls that either fully succeed
//! or fail with a single [`AdminError`]; there are no partial-success states.
//!
//! The wire transport lives outside this crate. Embedders provide a concrete
//! implementation (and a [`crate::client::AdminClientFactory`] that builds it
//! from the stored configuration); tests substitute a mock.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::SecretValue;

/// Request to create a scoped service account under an existing identity
#[derive(Debug, Clone)]
pub struct AddServiceAccountReq {
    /// Identity the service account is scoped to (the current access key)
    pub target_user: String,
    /// Fixed identity label for the new service account
    pub name: String,
    /// Optional policy document restricting the account; `None` inherits the
    /// target user's permissions
    pub policy: Option<serde_json::Value>,
    /// Human-readable description shown in the MinIO console
    pub description: String,
}

/// Request to replace a service account's secret key
#[derive(Clone)]
pub struct UpdateServiceAccountReq {
    /// The replacement secret key
    pub new_secret_key: SecretValue,
}

impl std::fmt::Debug for UpdateServiceAccountReq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateServiceAccountReq")
            .field("new_secret_key", &self.new_secret_key)
            .finish()
    }
}

/// Credential pair returned by a successful service-account creation
#[derive(Clone)]
pub struct ServiceAccountCredential {
    /// Access key of the new service account
    pub access_key: String,
    /// Secret key of the new service account
    pub secret_key: SecretValue,
}

impl std::fmt::Debug for ServiceAccountCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountCredential")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key)
            .finish()
    }
}

/// Failure reported by the admin API client
#[derive(Debug, Error)]
pub enum AdminError {
    /// The request never completed (connection, TLS, timeout)
    #[error("transport failure talking to the MinIO admin API: {0}")]
    Transport(String),

    /// The API received the request and rejected it
    #[error("the MinIO admin API rejected the request: {0}")]
    Rejected(String),
}

/// The two admin API operations the engine consumes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Create a scoped service account under `req.target_user` and return its
    /// credential pair.
    async fn create_service_account(
        &self,
        req: AddServiceAccountReq,
    ) -> Result<ServiceAccountCredential, AdminError>;

    /// Replace the secret key of the service account identified by `name`.
    async fn update_service_account(
        &self,
        name: &str,
        req: UpdateServiceAccountReq,
    ) -> Result<(), AdminError>;
}
