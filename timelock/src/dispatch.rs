//! Action dispatch seam for proposal execution.

use agora_types::Action;
use thiserror::Error;

/// Error returned by a dispatcher when a batch cannot be applied.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct DispatchError {
    pub reason: String,
}

impl DispatchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Applies a proposal's recorded actions.
///
/// `execute_batch` is all-or-nothing: implementations must either apply
/// every action or leave no effect and return an error. The scheduler only
/// marks an entry executed after a successful dispatch, so a failed batch
/// stays queued and retryable within the grace period.
pub trait ActionDispatcher {
    fn execute_batch(&mut self, actions: &[Action]) -> Result<(), DispatchError>;
}
