//! Host persistence boundary.
//!
//! The secret-management host owns durable storage; the engine only sees this
//! byte-level key-value trait. The backend is assumed to give per-key
//! read-after-write consistency and nothing more: there are no cross-key
//! transactions, and concurrent writers to the same key are serialized only
//! as far as the backend itself serializes them.

mod memory;

pub use memory::MemoryBackend;

use async_trait::async_trait;

use crate::core::StorageError;

/// Key-value storage supplied by the embedding host.
///
/// Implementations report failures through [`StorageError`] with the key and
/// a backend-specific reason; the engine never retries on its own.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the value at `key`, or `None` if nothing is stored there.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write `value` at `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove the value at `key`. Deleting an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
