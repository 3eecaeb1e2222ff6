//! Nullable action dispatcher — records batches instead of executing them.

use agora_timelock::{ActionDispatcher, DispatchError};
use agora_types::Action;

/// Records every dispatched batch; optionally fails on demand.
#[derive(Default)]
pub struct NullDispatcher {
    batches: Vec<Vec<Action>>,
    fail_with: Option<String>,
}

impl NullDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent dispatch fail with `reason`.
    pub fn fail_with(&mut self, reason: impl Into<String>) {
        self.fail_with = Some(reason.into());
    }

    /// Stop failing dispatches.
    pub fn succeed(&mut self) {
        self.fail_with = None;
    }

    /// All batches dispatched so far.
    pub fn batches(&self) -> &[Vec<Action>] {
        &self.batches
    }
}

impl ActionDispatcher for NullDispatcher {
    fn execute_batch(&mut self, actions: &[Action]) -> Result<(), DispatchError> {
        if let Some(reason) = &self.fail_with {
            return Err(DispatchError::new(reason.clone()));
        }
        self.batches.push(actions.to_vec());
        Ok(())
    }
}
