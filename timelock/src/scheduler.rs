//! The timelock scheduler.

use crate::dispatch::ActionDispatcher;
use crate::error::TimelockError;
use crate::roles::{Capability, RoleSet};
use agora_store::TimelockStore;
use agora_types::{Account, Action, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A scheduled execution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelockEntry {
    pub id: ProposalId,
    /// Earliest execution time: voting deadline + minimum delay.
    pub eta: Timestamp,
    pub queued_at: Timestamp,
    pub executed: bool,
}

/// Scheduler configuration persisted alongside entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct SchedulerConfig {
    min_delay_secs: u64,
    grace_period_secs: u64,
}

const ROLES_META_KEY: &[u8] = b"roles";
const CONFIG_META_KEY: &[u8] = b"config";

/// Holds passed proposals for a mandatory delay, then permits execution
/// exactly once within a grace window.
pub struct TimelockScheduler {
    min_delay_secs: u64,
    grace_period_secs: u64,
    entries: HashMap<ProposalId, TimelockEntry>,
    roles: RoleSet,
}

impl TimelockScheduler {
    pub fn new(min_delay_secs: u64, grace_period_secs: u64, admin: Account) -> Self {
        Self {
            min_delay_secs,
            grace_period_secs,
            entries: HashMap::new(),
            roles: RoleSet::with_admin(admin),
        }
    }

    pub fn min_delay_secs(&self) -> u64 {
        self.min_delay_secs
    }

    pub fn grace_period_secs(&self) -> u64 {
        self.grace_period_secs
    }

    /// The instant a scheduled execution lapses.
    pub fn expiry_deadline(&self, eta: Timestamp) -> Timestamp {
        eta.plus_secs(self.grace_period_secs)
    }

    // ── Roles ────────────────────────────────────────────────────────────

    pub fn has_role(&self, capability: Capability, account: &Account) -> bool {
        self.roles.has(capability, account)
    }

    pub fn grant_role(
        &mut self,
        capability: Capability,
        account: Account,
        by: &Account,
    ) -> Result<(), TimelockError> {
        self.roles.grant(capability, account, by)
    }

    pub fn revoke_role(
        &mut self,
        capability: Capability,
        account: &Account,
        by: &Account,
    ) -> Result<(), TimelockError> {
        self.roles.revoke(capability, account, by)
    }

    // ── Scheduling ───────────────────────────────────────────────────────

    /// Queue a proposal for execution at `eta`.
    ///
    /// `by` must hold the Proposer capability. Queueing past the grace
    /// deadline is rejected — the proposal has already lapsed.
    pub fn schedule(
        &mut self,
        id: ProposalId,
        eta: Timestamp,
        by: &Account,
        now: Timestamp,
    ) -> Result<(), TimelockError> {
        self.roles.require(Capability::Proposer, by)?;
        if self.entries.contains_key(&id) {
            return Err(TimelockError::AlreadyQueued(id));
        }
        if now > self.expiry_deadline(eta) {
            return Err(TimelockError::LapsedUnexecuted(id));
        }
        self.entries.insert(
            id,
            TimelockEntry {
                id,
                eta,
                queued_at: now,
                executed: false,
            },
        );
        tracing::debug!(proposal = %id, %eta, "proposal queued");
        Ok(())
    }

    /// Execute a queued proposal's actions.
    ///
    /// `by` must hold the Executor capability; the delay must have elapsed
    /// and the grace window must still be open. The batch is dispatched
    /// atomically; the entry is marked executed only on success.
    pub fn execute(
        &mut self,
        id: &ProposalId,
        actions: &[Action],
        dispatcher: &mut dyn ActionDispatcher,
        by: &Account,
        now: Timestamp,
    ) -> Result<(), TimelockError> {
        self.roles.require(Capability::Executor, by)?;
        let entry = self
            .entries
            .get(id)
            .ok_or(TimelockError::NotQueued(*id))?;
        if entry.executed {
            return Err(TimelockError::AlreadyExecuted(*id));
        }
        if now < entry.eta {
            return Err(TimelockError::DelayNotElapsed {
                eta: entry.eta,
                now,
            });
        }
        if now > self.expiry_deadline(entry.eta) {
            return Err(TimelockError::LapsedUnexecuted(*id));
        }

        dispatcher
            .execute_batch(actions)
            .map_err(|e| TimelockError::DispatchFailed(e.to_string()))?;

        // Dispatch succeeded; the entry invariantly exists.
        if let Some(entry) = self.entries.get_mut(id) {
            entry.executed = true;
        }
        tracing::info!(proposal = %id, actions = actions.len(), "proposal executed");
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn entry(&self, id: &ProposalId) -> Option<&TimelockEntry> {
        self.entries.get(id)
    }

    pub fn is_queued(&self, id: &ProposalId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn is_executed(&self, id: &ProposalId) -> bool {
        self.entries.get(id).map(|e| e.executed).unwrap_or(false)
    }

    // ── Persistence ──────────────────────────────────────────────────────

    /// Persist entries, role membership, and configuration.
    pub fn save_to_store(&self, store: &dyn TimelockStore) -> Result<(), TimelockError> {
        for (id, entry) in &self.entries {
            let bytes = bincode::serialize(entry)
                .map_err(|e| TimelockError::Storage(e.to_string()))?;
            store
                .put_entry(id, &bytes)
                .map_err(|e| TimelockError::Storage(e.to_string()))?;
        }
        let roles_bytes = bincode::serialize(&self.roles)
            .map_err(|e| TimelockError::Storage(e.to_string()))?;
        store
            .put_timelock_meta(ROLES_META_KEY, &roles_bytes)
            .map_err(|e| TimelockError::Storage(e.to_string()))?;
        let config = SchedulerConfig {
            min_delay_secs: self.min_delay_secs,
            grace_period_secs: self.grace_period_secs,
        };
        let config_bytes = bincode::serialize(&config)
            .map_err(|e| TimelockError::Storage(e.to_string()))?;
        store
            .put_timelock_meta(CONFIG_META_KEY, &config_bytes)
            .map_err(|e| TimelockError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Restore a scheduler from a store.
    pub fn load_from_store(store: &dyn TimelockStore) -> Result<Self, TimelockError> {
        let config_bytes = store
            .get_timelock_meta(CONFIG_META_KEY)
            .map_err(|e| TimelockError::Storage(e.to_string()))?
            .ok_or_else(|| TimelockError::Storage("timelock config not found".into()))?;
        let config: SchedulerConfig = bincode::deserialize(&config_bytes)
            .map_err(|e| TimelockError::Storage(e.to_string()))?;

        let roles_bytes = store
            .get_timelock_meta(ROLES_META_KEY)
            .map_err(|e| TimelockError::Storage(e.to_string()))?
            .ok_or_else(|| TimelockError::Storage("timelock roles not found".into()))?;
        let roles: RoleSet = bincode::deserialize(&roles_bytes)
            .map_err(|e| TimelockError::Storage(e.to_string()))?;

        let mut entries = HashMap::new();
        for (id, bytes) in store
            .iter_entries()
            .map_err(|e| TimelockError::Storage(e.to_string()))?
        {
            let entry: TimelockEntry = bincode::deserialize(&bytes)
                .map_err(|e| TimelockError::Storage(e.to_string()))?;
            entries.insert(id, entry);
        }

        Ok(Self {
            min_delay_secs: config.min_delay_secs,
            grace_period_secs: config.grace_period_secs,
            entries,
            roles,
        })
    }
}
