//! Proposals and content-addressed proposal identifiers.

use crate::error::GovernorError;
use agora_crypto::blake2b_256_multi;
use agora_types::{Account, Action, DescriptionHash, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// A registered proposal. Immutable once created; only the `canceled` flag
/// may be set, and only while the proposal is still pending.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Account,
    pub actions: Vec<Action>,
    pub description: String,
    pub created_at: Timestamp,
    /// Voting-window start; also the weight and quorum snapshot timepoint.
    pub vote_start: Timestamp,
    /// Voting-window end (inclusive).
    pub vote_end: Timestamp,
    pub canceled: bool,
}

/// Compute a proposal identifier from its action payload and description
/// hash.
///
/// Pure and deterministic: any caller can recompute the id without ledger
/// state. The digest covers the action count, each action's canonical
/// encoding, and the description hash.
pub fn hash_proposal(actions: &[Action], description_hash: &DescriptionHash) -> ProposalId {
    let mut parts: Vec<Vec<u8>> = Vec::with_capacity(actions.len() + 2);
    parts.push((actions.len() as u32).to_be_bytes().to_vec());
    for action in actions {
        parts.push(action.canonical_bytes());
    }
    parts.push(description_hash.as_bytes().to_vec());
    let refs: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
    ProposalId::new(blake2b_256_multi(&refs))
}

/// Zip the external parallel arrays into actions, rejecting empty or
/// mismatched input.
pub fn zip_actions(
    targets: Vec<Account>,
    values: Vec<u128>,
    payloads: Vec<Vec<u8>>,
) -> Result<Vec<Action>, GovernorError> {
    if targets.len() != values.len() || targets.len() != payloads.len() {
        return Err(GovernorError::LengthMismatch {
            targets: targets.len(),
            values: values.len(),
            payloads: payloads.len(),
        });
    }
    if targets.is_empty() {
        return Err(GovernorError::EmptyProposal);
    }
    Ok(targets
        .into_iter()
        .zip(values)
        .zip(payloads)
        .map(|((target, value), payload)| Action::new(target, value, payload))
        .collect())
}
