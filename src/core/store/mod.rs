//! Per-environment config store.
//!
//! A flat mapping from string key to opaque bytes. The orchestrator keeps
//! the SSH key and the generated director manifest here, and refuses to boot
//! unless the store starts out empty.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `ConfigStore` trait
//! 2. Add the implementation in a new file (e.g., `s3.rs`)
//! 3. Re-export from this module

use crate::error::Result;

mod fs;

pub use fs::Filesystem;

/// Durable key → blob storage for one environment.
pub trait ConfigStore {
    /// Load the bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the key is absent.
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Once this returns `Ok`, the write survives a crash.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Whether the store holds no entries at all.
    ///
    /// # Errors
    ///
    /// Any failure to inspect the backing storage is returned, never treated
    /// as empty.
    fn is_empty(&self) -> Result<bool>;
}
