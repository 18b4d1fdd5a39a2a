//! Error types for the secrets engine
//!
//! Four leaf categories roll up into [`Error`]:
//! - [`ConfigurationError`]: required fields missing or an empty update
//! - [`StateError`]: operation invalid for the current lifecycle state
//! - [`StorageError`]: persistence read/write/decode failure
//! - [`UpstreamError`]: the MinIO admin API rejected or never received a call
//!
//! [`ConfigurationError`] and [`StateError`] are client faults: the caller can
//! recover by supplying correct input or by running the missing lifecycle step
//! first. [`StorageError`] and [`UpstreamError`] are server faults. Nothing in
//! this crate retries; every failure is returned to the caller unmodified.

use thiserror::Error;

use crate::admin::AdminError;

/// Top-level engine error
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is missing or malformed
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Operation not valid in the current credential lifecycle state
    #[error(transparent)]
    State(#[from] StateError),

    /// Persistence layer failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// MinIO admin API call failure
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl Error {
    /// Whether the failure should map to a client-fault (4xx-style) response
    /// rather than a server-fault one.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::State(_))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Missing or malformed configuration input
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A field required to build the admin client is not set.
    ///
    /// Fields are checked in a fixed order (`endpoint`, `access_key_id`,
    /// `secret_access_key`) and the first missing one is reported.
    #[error("'{field}' is not set; configure the engine before connecting")]
    MissingField {
        /// Name of the first missing configuration field
        field: &'static str,
    },

    /// A partial update supplied no recognized fields
    #[error("update contains no configuration fields")]
    EmptyUpdate,
}

/// Operation invalid for the current lifecycle state
#[derive(Debug, Error)]
pub enum StateError {
    /// Upgrade requested but the configured credential is already a scoped
    /// service account
    #[error("the configured credential is already a service account")]
    AlreadyServiceAccount,

    /// Rotation requested while still running on the root credential
    #[error("cannot rotate the root credential; upgrade to a service account first")]
    NotServiceAccount,
}

/// Persistence read/write/decode failure at a storage key
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to read a value from the host storage
    #[error("failed to read '{key}' from storage: {reason}")]
    ReadFailure {
        /// Storage key involved
        key: String,
        /// Backend-supplied failure description
        reason: String,
    },

    /// Failed to persist a value to the host storage
    #[error("failed to persist '{key}' to storage: {reason}")]
    WriteFailure {
        /// Storage key involved
        key: String,
        /// Backend-supplied failure description
        reason: String,
    },

    /// Failed to delete a value from the host storage
    #[error("failed to delete '{key}' from storage: {reason}")]
    DeleteFailure {
        /// Storage key involved
        key: String,
        /// Backend-supplied failure description
        reason: String,
    },

    /// A persisted record exists but cannot be decoded
    #[error("failed to decode the record at '{key}': {source}")]
    DecodeFailure {
        /// Storage key involved
        key: String,
        /// Underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized for persistence
    #[error("failed to encode the record for '{key}': {source}")]
    EncodeFailure {
        /// Storage key involved
        key: String,
        /// Underlying serialization error
        #[source]
        source: serde_json::Error,
    },
}

/// MinIO admin API call failure
///
/// Configuration is always left in its pre-call state when one of these is
/// returned; there is no partial write of a half-created credential.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Creating the scoped service account failed
    #[error("failed to create the scoped service account: {source}")]
    CreateServiceAccount {
        /// Underlying admin API error
        #[source]
        source: AdminError,
    },

    /// Rotating the service-account secret failed
    #[error("failed to rotate the service account secret: {source}")]
    RotateSecret {
        /// Underlying admin API error
        #[source]
        source: AdminError,
    },
}
