//! Timelock storage trait.

use crate::StoreError;
use agora_types::ProposalId;

/// Trait for storing timelock entries plus the scheduler's own metadata
/// (role membership, configured delays).
pub trait TimelockStore {
    /// Store a timelock entry.
    fn put_entry(&self, id: &ProposalId, data: &[u8]) -> Result<(), StoreError>;

    /// Get a timelock entry by proposal id.
    fn get_entry(&self, id: &ProposalId) -> Result<Option<Vec<u8>>, StoreError>;

    /// All stored timelock entries.
    fn iter_entries(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError>;

    /// Get a scheduler metadata value.
    fn get_timelock_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store a scheduler metadata value.
    fn put_timelock_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
