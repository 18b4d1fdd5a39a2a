//! MinIO secrets engine core - credential lifecycle management
//!
//! This crate implements the credential-management core of a secrets-engine
//! backend that mediates between a secret-management host and the MinIO
//! administrative API:
//!
//! - **Connection configuration** - a single persisted record holding the
//!   endpoint and the active access key pair, updated by partial merges
//! - **Admin client caching** - one lazily constructed client handle,
//!   discarded whenever the configuration changes
//! - **Service-account upgrade** - one-way replacement of the privileged
//!   root credential with a scoped service account
//! - **Secret rotation** - replacement of the service-account secret key
//!   through the admin API, committed locally only after the remote accepts it
//!
//! The host's request dispatch, its durable storage implementation, and the
//! admin API wire transport stay outside this crate; they plug in through the
//! [`storage::StorageBackend`], [`client::AdminClientFactory`], and
//! [`admin::AdminApi`] traits.
#![deny(unsafe_code)]
#![forbid(unsafe_code)]

/// Remote administrative API boundary
pub mod admin;
/// Backend wiring - one instance per mount, shared by all request handlers
pub mod backend;
/// Cached admin client handle
pub mod client;
/// Connection configuration entity and its store
pub mod config;
/// Controller for the upgrade and rotation protocols
pub mod controller;
/// Core errors and secret primitives
pub mod core;
/// Host persistence boundary
pub mod storage;
/// Utilities for secret generation
pub mod utils;

// ── Root re-exports ─────────────────────────────────────────────────────────

pub use crate::backend::MinioBackend;
pub use crate::core::{
    ConfigurationError, Error, Result, SecretValue, StateError, StorageError, UpstreamError,
};

/// Commonly used types and traits
pub mod prelude {
    pub use crate::admin::{
        AddServiceAccountReq, AdminApi, AdminError, ServiceAccountCredential,
        UpdateServiceAccountReq,
    };
    pub use crate::backend::MinioBackend;
    pub use crate::client::{AdminClientFactory, ClientCache};
    pub use crate::config::{ConfigStore, ConfigUpdate, CredentialIntent, EngineConfig};
    pub use crate::controller::{CredentialController, SERVICE_ACCOUNT_NAME};
    pub use crate::core::{
        ConfigurationError, Error, Result, SecretValue, StateError, StorageError, UpstreamError,
    };
    pub use crate::storage::{MemoryBackend, StorageBackend};
    pub use crate::utils::generate_secret_access_key;
}
