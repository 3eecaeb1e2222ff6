//! State enums for proposals and vote choices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The phase of a proposal, derived from ledger records and the current time.
///
/// Pending → Active → (Defeated | Succeeded) → Queued → Executed, with
/// Canceled reachable from Pending and Expired absorbing from
/// Succeeded/Queued once the execution window lapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Created; voting has not started.
    Pending,
    /// Voting window is open.
    Active,
    /// Withdrawn by the proposer before voting started.
    Canceled,
    /// Voting ended without a favorable outcome or quorum.
    Defeated,
    /// Passed; awaiting queueing into the timelock.
    Succeeded,
    /// Queued; awaiting the timelock delay.
    Queued,
    /// Passed but the execution window lapsed without execution.
    Expired,
    /// Executed; terminal.
    Executed,
}

impl ProposalState {
    /// Whether votes may be cast in this state.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Canceled | Self::Defeated | Self::Expired | Self::Executed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Queued => "queued",
            Self::Expired => "expired",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A vote choice, wire-encoded as 0 = against, 1 = for, 2 = abstain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteSupport {
    Against,
    For,
    Abstain,
}

impl VoteSupport {
    /// Decode the external support value; `None` for anything but 0, 1, 2.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Against),
            1 => Some(Self::For),
            2 => Some(Self::Abstain),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Against => 0,
            Self::For => 1,
            Self::Abstain => 2,
        }
    }
}
