//! Key/value storage backing the cache slot and the session flag
//!
//! Two scopes are used: a persistent store that survives restarts (one JSON
//! file per key on disk) and a session store that lives as long as the
//! process. Both hold plain strings under well-known keys.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors raised by a storage backend
///
/// These are not handled by the controller; they propagate to the caller.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded for storage
    #[error("Failed to encode stored value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string key/value store
pub trait Storage {
    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
