//! Proposal storage trait.

use crate::StoreError;
use agora_types::ProposalId;

/// Trait for storing proposal records keyed by their content-addressed id.
pub trait ProposalStore {
    /// Store a proposal record.
    fn put_proposal(&self, id: &ProposalId, data: &[u8]) -> Result<(), StoreError>;

    /// Get a proposal record by id.
    fn get_proposal(&self, id: &ProposalId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Delete a proposal record.
    fn delete_proposal(&self, id: &ProposalId) -> Result<(), StoreError>;

    /// All stored proposal records.
    fn iter_proposals(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError>;
}
