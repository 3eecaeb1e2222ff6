//! Fundamental types for the Agora governance engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: accounts, proposal identifiers, actions, timestamps, governance
//! parameters, and state enums.

pub mod account;
pub mod action;
pub mod hash;
pub mod params;
pub mod state;
pub mod time;

pub use account::Account;
pub use action::Action;
pub use hash::{DescriptionHash, ProposalId};
pub use params::GovernorParams;
pub use state::{ProposalState, VoteSupport};
pub use time::Timestamp;
