//! Governance core for Agora.
//!
//! A deterministic, serially ordered governance ledger:
//! proposals are content-addressed batches of actions; voting weight is
//! snapshotted at the voting-window start; quorum is a fraction of the
//! snapshotted token supply; passed proposals execute through a timelock.
//!
//! A proposal's phase is never stored — it is derived from the vote, queue,
//! execute, and cancel records plus the caller-supplied current time:
//! Pending → Active → (Defeated | Succeeded) → Queued → Executed, with
//! Canceled and Expired as absorbing states.

pub mod engine;
pub mod error;
pub mod proposal;
pub mod tally;

pub use engine::GovernorEngine;
pub use error::GovernorError;
pub use proposal::{hash_proposal, Proposal};
pub use tally::{VoteReceipt, VoteTally};
