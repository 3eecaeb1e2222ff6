use thiserror::Error;

use agora_timelock::TimelockError;
use agora_types::{Account, ProposalId, ProposalState};
use agora_votes::VotesError;

#[derive(Debug, Error)]
pub enum GovernorError {
    #[error("proposal has no actions")]
    EmptyProposal,

    #[error("mismatched proposal arrays: {targets} targets, {values} values, {payloads} payloads")]
    LengthMismatch {
        targets: usize,
        values: usize,
        payloads: usize,
    },

    #[error("proposal {0} already exists")]
    AlreadyProposed(ProposalId),

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("account {0} has already voted on this proposal")]
    AlreadyVoted(Account),

    #[error("voting is closed for this proposal")]
    VotingClosed,

    #[error("unknown vote support value {0}")]
    InvalidSupport(u8),

    #[error("proposal is {0}; queueing requires a succeeded proposal")]
    NotSucceeded(ProposalState),

    #[error("proposal is {0}; cancellation is only possible while pending")]
    TooLateToCancel(ProposalState),

    #[error("only the proposer or a timelock admin can cancel")]
    UnauthorizedCancel,

    #[error("vote weight overflow")]
    Overflow,

    #[error(transparent)]
    Timelock(#[from] TimelockError),

    #[error(transparent)]
    Votes(#[from] VotesError),

    #[error("storage error: {0}")]
    Store(String),
}
