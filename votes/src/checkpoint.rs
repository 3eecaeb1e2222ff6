//! Append-only checkpoint history with binary-search lookups.

use crate::error::VotesError;
use agora_types::Timestamp;
use serde::{Deserialize, Serialize};

/// A recorded value at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub at: Timestamp,
    pub value: u128,
}

/// An append-only series of checkpoints ordered by timestamp.
///
/// Writes at the same timestamp coalesce into one checkpoint; writes at an
/// earlier timestamp are rejected (time is a monotonic external input).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointHistory {
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointHistory {
    pub fn new() -> Self {
        Self {
            checkpoints: Vec::new(),
        }
    }

    /// The most recent value, or zero if no checkpoint exists.
    pub fn latest(&self) -> u128 {
        self.checkpoints.last().map(|c| c.value).unwrap_or(0)
    }

    /// The value as of `timepoint`: the last checkpoint at-or-before it,
    /// or zero if none exists yet.
    pub fn value_at(&self, timepoint: Timestamp) -> u128 {
        let idx = self.checkpoints.partition_point(|c| c.at <= timepoint);
        if idx == 0 {
            0
        } else {
            self.checkpoints[idx - 1].value
        }
    }

    /// Verify a write at `at` would not travel backwards in time.
    pub fn ensure_monotonic(&self, at: Timestamp) -> Result<(), VotesError> {
        match self.checkpoints.last() {
            Some(last) if last.at > at => Err(VotesError::TimestampRegression { last: last.at, at }),
            _ => Ok(()),
        }
    }

    /// Record `value` at `at`, coalescing same-timestamp writes.
    pub fn push(&mut self, at: Timestamp, value: u128) -> Result<(), VotesError> {
        self.ensure_monotonic(at)?;
        match self.checkpoints.last_mut() {
            Some(last) if last.at == at => last.value = value,
            _ => self.checkpoints.push(Checkpoint { at, value }),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}
