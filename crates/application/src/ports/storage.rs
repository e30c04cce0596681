//! Client-side persistent storage port.
//!
//! The string key/value store a browser would offer as `localStorage`.
//! The token store and the active-profile store are built on top of it,
//! so tests swap in memory and production swaps in a file.

use async_trait::async_trait;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Repository trait for persisted client state.
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
