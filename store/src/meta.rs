//! Engine metadata storage trait.

use crate::StoreError;

/// Trait for storing engine-level metadata blobs (parameters, ledger
/// snapshots, schema markers) under string keys.
pub trait MetaStore {
    /// Store a metadata value.
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Get a metadata value.
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Delete a metadata value.
    fn delete_meta(&self, key: &str) -> Result<(), StoreError>;
}
