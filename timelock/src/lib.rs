//! Timelock scheduler for the Agora governance engine.
//!
//! Passed proposals are held for a mandatory delay before execution, gated
//! by a capability set {Proposer, Executor, Admin}. Execution dispatches the
//! proposal's recorded actions atomically through an [`ActionDispatcher`]
//! and happens at most once; entries that outlive the grace period expire.

pub mod dispatch;
pub mod error;
pub mod roles;
pub mod scheduler;

pub use dispatch::{ActionDispatcher, DispatchError};
pub use error::TimelockError;
pub use roles::{Capability, RoleSet};
pub use scheduler::{TimelockEntry, TimelockScheduler};
