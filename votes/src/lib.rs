//! Voting-token ledger for the Agora governance engine.
//!
//! Tracks token balances, delegation, and checkpointed voting weight so the
//! governance engine can read weights *as of* a past timepoint: a voter's
//! weight is their delegated balance at the proposal snapshot, unaffected by
//! anything that happens afterwards.
//!
//! Key principle: balance carries no voting weight until delegated.
//! Self-delegation is the normal case for an account voting with its own
//! tokens.

pub mod checkpoint;
pub mod error;
pub mod ledger;

pub use checkpoint::{Checkpoint, CheckpointHistory};
pub use error::VotesError;
pub use ledger::{VotesLedger, VotesSnapshot};
