//! Proposal actions — the calls a proposal executes when it passes.

use crate::account::Account;
use serde::{Deserialize, Serialize};

/// One call recorded in a proposal: a target account, a transferred value,
/// and an opaque call payload.
///
/// Actions are immutable once proposed; the proposal identifier is computed
/// over their canonical encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub target: Account,
    pub value: u128,
    pub payload: Vec<u8>,
}

impl Action {
    pub fn new(target: Account, value: u128, payload: Vec<u8>) -> Self {
        Self {
            target,
            value,
            payload,
        }
    }

    /// Canonical byte encoding used for content addressing.
    ///
    /// Length-prefixed framing (u32 big-endian) keeps the encoding
    /// unambiguous under concatenation: `(target, value, payload)` triples
    /// that differ anywhere produce different byte strings.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let target = self.target.as_str().as_bytes();
        let mut out = Vec::with_capacity(4 + target.len() + 16 + 4 + self.payload.len());
        out.extend_from_slice(&(target.len() as u32).to_be_bytes());
        out.extend_from_slice(target);
        out.extend_from_slice(&self.value.to_be_bytes());
        out.extend_from_slice(&(self.payload.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.payload);
        out
    }
}
