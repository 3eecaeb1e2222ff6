//! Capability set for timelock operations.
//!
//! Replaces external access-control machinery with an explicit
//! authorization check at the scheduler boundary: Proposer may queue,
//! Executor may execute, Admin manages membership and may cancel.

use crate::error::TimelockError;
use agora_types::Account;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A capability an account can hold on the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// May queue passed proposals.
    Proposer,
    /// May execute queued proposals once their delay elapses.
    Executor,
    /// May grant and revoke capabilities, and cancel pending proposals.
    Admin,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposer => "proposer",
            Self::Executor => "executor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Membership of accounts per capability.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleSet {
    members: HashMap<Capability, HashSet<Account>>,
}

impl RoleSet {
    /// A role set bootstrapped with a single admin.
    pub fn with_admin(admin: Account) -> Self {
        let mut members: HashMap<Capability, HashSet<Account>> = HashMap::new();
        members.entry(Capability::Admin).or_default().insert(admin);
        Self { members }
    }

    /// Whether `account` holds `capability`.
    pub fn has(&self, capability: Capability, account: &Account) -> bool {
        self.members
            .get(&capability)
            .map(|set| set.contains(account))
            .unwrap_or(false)
    }

    /// Fail with `Unauthorized` unless `account` holds `capability`.
    pub fn require(&self, capability: Capability, account: &Account) -> Result<(), TimelockError> {
        if self.has(capability, account) {
            Ok(())
        } else {
            Err(TimelockError::Unauthorized {
                account: account.clone(),
                capability,
            })
        }
    }

    /// Grant `capability` to `account`. Admin-gated.
    pub fn grant(
        &mut self,
        capability: Capability,
        account: Account,
        by: &Account,
    ) -> Result<(), TimelockError> {
        self.require(Capability::Admin, by)?;
        self.members.entry(capability).or_default().insert(account);
        Ok(())
    }

    /// Revoke `capability` from `account`. Admin-gated.
    pub fn revoke(
        &mut self,
        capability: Capability,
        account: &Account,
        by: &Account,
    ) -> Result<(), TimelockError> {
        self.require(Capability::Admin, by)?;
        if let Some(set) = self.members.get_mut(&capability) {
            set.remove(account);
            if set.is_empty() {
                self.members.remove(&capability);
            }
        }
        Ok(())
    }

    /// All accounts holding `capability`.
    pub fn members_of(&self, capability: Capability) -> Vec<&Account> {
        self.members
            .get(&capability)
            .map(|set| set.iter().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> Account {
        Account::new(format!("agr_{}", name))
    }

    #[test]
    fn admin_bootstraps_and_grants() {
        let admin = account("admin");
        let proposer = account("proposer");
        let mut roles = RoleSet::with_admin(admin.clone());

        assert!(roles.has(Capability::Admin, &admin));
        assert!(!roles.has(Capability::Proposer, &proposer));

        roles
            .grant(Capability::Proposer, proposer.clone(), &admin)
            .unwrap();
        assert!(roles.has(Capability::Proposer, &proposer));
    }

    #[test]
    fn non_admin_cannot_grant() {
        let admin = account("admin");
        let mallory = account("mallory");
        let mut roles = RoleSet::with_admin(admin);

        let err = roles
            .grant(Capability::Executor, mallory.clone(), &mallory)
            .unwrap_err();
        assert!(matches!(err, TimelockError::Unauthorized { .. }));
    }

    #[test]
    fn revoke_removes_membership() {
        let admin = account("admin");
        let executor = account("executor");
        let mut roles = RoleSet::with_admin(admin.clone());
        roles
            .grant(Capability::Executor, executor.clone(), &admin)
            .unwrap();
        roles
            .revoke(Capability::Executor, &executor, &admin)
            .unwrap();
        assert!(!roles.has(Capability::Executor, &executor));
    }

    #[test]
    fn capability_is_not_transitive() {
        let admin = account("admin");
        let proposer = account("proposer");
        let mut roles = RoleSet::with_admin(admin.clone());
        roles
            .grant(Capability::Proposer, proposer.clone(), &admin)
            .unwrap();

        assert!(roles.require(Capability::Executor, &proposer).is_err());
        assert!(roles.require(Capability::Admin, &proposer).is_err());
    }
}
