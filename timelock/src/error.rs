use thiserror::Error;

use crate::roles::Capability;
use agora_types::{Account, ProposalId, Timestamp};

#[derive(Debug, Error)]
pub enum TimelockError {
    #[error("proposal {0} is not queued")]
    NotQueued(ProposalId),

    #[error("proposal {0} is already queued")]
    AlreadyQueued(ProposalId),

    #[error("timelock delay has not elapsed: executable at {eta}, now {now}")]
    DelayNotElapsed { eta: Timestamp, now: Timestamp },

    #[error("proposal {0} lapsed unexecuted — grace period is over")]
    LapsedUnexecuted(ProposalId),

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("account {account} lacks the {capability} capability")]
    Unauthorized {
        account: Account,
        capability: Capability,
    },

    #[error("dispatch failed: {0}")]
    DispatchFailed(String),

    #[error("storage error: {0}")]
    Storage(String),
}
