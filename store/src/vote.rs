//! Vote receipt storage trait.

use crate::StoreError;
use agora_types::{Account, ProposalId};

/// Trait for storing vote receipts keyed by (proposal, voter).
pub trait VoteStore {
    /// Store a voter's receipt on a proposal.
    fn put_vote(
        &self,
        proposal: &ProposalId,
        voter: &Account,
        data: &[u8],
    ) -> Result<(), StoreError>;

    /// Get a specific voter's receipt on a proposal.
    fn get_vote(
        &self,
        proposal: &ProposalId,
        voter: &Account,
    ) -> Result<Option<Vec<u8>>, StoreError>;

    /// All receipts recorded for a proposal.
    fn iter_votes(&self, proposal: &ProposalId) -> Result<Vec<(Account, Vec<u8>)>, StoreError>;
}
