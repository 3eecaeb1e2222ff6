//! The voting-token ledger.

use crate::checkpoint::CheckpointHistory;
use crate::error::VotesError;
use agora_types::{Account, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Balances, delegation, and checkpointed voting weight.
///
/// Weight moves between *delegates*, not holders: transferring tokens moves
/// weight from the sender's delegate to the recipient's delegate, and an
/// undelegated balance carries no weight at all. Every weight change writes
/// a checkpoint, so past lookups are stable forever.
#[derive(Clone, Debug, Default)]
pub struct VotesLedger {
    balances: HashMap<Account, u128>,
    delegates: HashMap<Account, Account>,
    /// Voting-weight history per delegate.
    checkpoints: HashMap<Account, CheckpointHistory>,
    /// Total-supply history.
    supply: CheckpointHistory,
}

impl VotesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Mint `amount` new tokens to `to`.
    pub fn mint(&mut self, to: &Account, amount: u128, now: Timestamp) -> Result<(), VotesError> {
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(VotesError::Overflow)?;
        let new_supply = self
            .supply
            .latest()
            .checked_add(amount)
            .ok_or(VotesError::Overflow)?;
        self.supply.ensure_monotonic(now)?;

        let delegate = self.delegates.get(to).cloned();
        self.move_delegated(None, delegate.as_ref(), amount, now)?;
        self.supply.push(now, new_supply)?;
        self.balances.insert(to.clone(), to_balance);
        Ok(())
    }

    /// Transfer `amount` tokens from `from` to `to`.
    ///
    /// Moves voting weight from `from`'s delegate to `to`'s delegate; the
    /// recorded weight of any past timepoint is unaffected.
    pub fn transfer(
        &mut self,
        from: &Account,
        to: &Account,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), VotesError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(VotesError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(VotesError::Overflow)?;

        let from_delegate = self.delegates.get(from).cloned();
        let to_delegate = self.delegates.get(to).cloned();
        self.move_delegated(from_delegate.as_ref(), to_delegate.as_ref(), amount, now)?;

        self.balances.insert(from.clone(), from_balance - amount);
        self.balances.insert(to.clone(), to_balance);
        Ok(())
    }

    /// Delegate `who`'s voting weight to `to`.
    ///
    /// Self-delegation is the normal case for an account voting with its
    /// own tokens. Re-delegation moves the full current balance to the new
    /// delegate.
    pub fn delegate(
        &mut self,
        who: &Account,
        to: &Account,
        now: Timestamp,
    ) -> Result<(), VotesError> {
        let old = self.delegates.get(who).cloned();
        if old.as_ref() == Some(to) {
            return Ok(());
        }
        let weight = self.balance_of(who);
        self.move_delegated(old.as_ref(), Some(to), weight, now)?;
        self.delegates.insert(who.clone(), to.clone());
        Ok(())
    }

    /// Move delegated weight between two (optional) delegates.
    ///
    /// Validates both endpoints before writing either, so a failure leaves
    /// no partial mutation.
    fn move_delegated(
        &mut self,
        from: Option<&Account>,
        to: Option<&Account>,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), VotesError> {
        if amount == 0 || from == to {
            return Ok(());
        }
        let mut src_next = None;
        if let Some(src) = from {
            let hist = self.checkpoints.get(src);
            let have = hist.map(|h| h.latest()).unwrap_or(0);
            let next = have
                .checked_sub(amount)
                .ok_or(VotesError::WeightUnderflow { have, need: amount })?;
            if let Some(h) = hist {
                h.ensure_monotonic(now)?;
            }
            src_next = Some(next);
        }
        let mut dst_next = None;
        if let Some(dst) = to {
            let hist = self.checkpoints.get(dst);
            let next = hist
                .map(|h| h.latest())
                .unwrap_or(0)
                .checked_add(amount)
                .ok_or(VotesError::Overflow)?;
            if let Some(h) = hist {
                h.ensure_monotonic(now)?;
            }
            dst_next = Some(next);
        }

        // Both sides validated; the pushes below cannot fail.
        if let (Some(src), Some(next)) = (from, src_next) {
            self.checkpoints.entry(src.clone()).or_default().push(now, next)?;
        }
        if let (Some(dst), Some(next)) = (to, dst_next) {
            self.checkpoints.entry(dst.clone()).or_default().push(now, next)?;
        }
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// Current token balance of an account.
    pub fn balance_of(&self, account: &Account) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// The delegate currently chosen by `account`, if any.
    pub fn delegate_of(&self, account: &Account) -> Option<&Account> {
        self.delegates.get(account)
    }

    /// Current voting weight of an account (delegated to it).
    pub fn votes(&self, account: &Account) -> u128 {
        self.checkpoints
            .get(account)
            .map(|h| h.latest())
            .unwrap_or(0)
    }

    /// Voting weight of an account as of `timepoint`.
    pub fn past_votes(&self, account: &Account, timepoint: Timestamp) -> u128 {
        self.checkpoints
            .get(account)
            .map(|h| h.value_at(timepoint))
            .unwrap_or(0)
    }

    /// Current total token supply.
    pub fn total_supply(&self) -> u128 {
        self.supply.latest()
    }

    /// Total token supply as of `timepoint`.
    pub fn past_total_supply(&self, timepoint: Timestamp) -> u128 {
        self.supply.value_at(timepoint)
    }
}

/// Meta-store key used for persisting the ledger state.
const VOTES_LEDGER_META_KEY: &str = "votes_ledger_state";

/// Serializable snapshot of the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VotesSnapshot {
    pub balances: HashMap<Account, u128>,
    pub delegates: HashMap<Account, Account>,
    pub checkpoints: HashMap<Account, CheckpointHistory>,
    pub supply: CheckpointHistory,
}

impl VotesLedger {
    /// Serialize the ledger to bytes for persistence.
    pub fn save_state(&self) -> Vec<u8> {
        let snapshot = VotesSnapshot {
            balances: self.balances.clone(),
            delegates: self.delegates.clone(),
            checkpoints: self.checkpoints.clone(),
            supply: self.supply.clone(),
        };
        bincode::serialize(&snapshot).unwrap_or_default()
    }

    /// Restore a ledger from serialized bytes.
    pub fn load_state(data: &[u8]) -> Self {
        match bincode::deserialize::<VotesSnapshot>(data) {
            Ok(snapshot) => Self {
                balances: snapshot.balances,
                delegates: snapshot.delegates,
                checkpoints: snapshot.checkpoints,
                supply: snapshot.supply,
            },
            Err(_) => Self::default(),
        }
    }

    /// The meta-store key used for ledger persistence.
    pub fn meta_key() -> &'static str {
        VOTES_LEDGER_META_KEY
    }
}
