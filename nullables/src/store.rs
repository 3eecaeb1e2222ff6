//! Nullable store — thread-safe in-memory storage for testing.

use agora_store::{MetaStore, ProposalStore, StoreError, TimelockStore, VoteStore};
use agora_types::{Account, ProposalId};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory implementation of every governance store trait.
#[derive(Default)]
pub struct NullStore {
    proposals: Mutex<HashMap<ProposalId, Vec<u8>>>,
    votes: Mutex<HashMap<ProposalId, HashMap<String, Vec<u8>>>>,
    entries: Mutex<HashMap<ProposalId, Vec<u8>>>,
    timelock_meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    meta: Mutex<HashMap<String, Vec<u8>>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProposalStore for NullStore {
    fn put_proposal(&self, id: &ProposalId, data: &[u8]) -> Result<(), StoreError> {
        self.proposals.lock().unwrap().insert(*id, data.to_vec());
        Ok(())
    }

    fn get_proposal(&self, id: &ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.proposals.lock().unwrap().get(id).cloned())
    }

    fn delete_proposal(&self, id: &ProposalId) -> Result<(), StoreError> {
        self.proposals.lock().unwrap().remove(id);
        Ok(())
    }

    fn iter_proposals(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError> {
        Ok(self
            .proposals
            .lock()
            .unwrap()
            .iter()
            .map(|(id, data)| (*id, data.clone()))
            .collect())
    }
}

impl VoteStore for NullStore {
    fn put_vote(
        &self,
        proposal: &ProposalId,
        voter: &Account,
        data: &[u8],
    ) -> Result<(), StoreError> {
        self.votes
            .lock()
            .unwrap()
            .entry(*proposal)
            .or_default()
            .insert(voter.as_str().to_string(), data.to_vec());
        Ok(())
    }

    fn get_vote(
        &self,
        proposal: &ProposalId,
        voter: &Account,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .get(proposal)
            .and_then(|votes| votes.get(voter.as_str()))
            .cloned())
    }

    fn iter_votes(&self, proposal: &ProposalId) -> Result<Vec<(Account, Vec<u8>)>, StoreError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .get(proposal)
            .map(|votes| {
                votes
                    .iter()
                    .map(|(voter, data)| (Account::new(voter.clone()), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl TimelockStore for NullStore {
    fn put_entry(&self, id: &ProposalId, data: &[u8]) -> Result<(), StoreError> {
        self.entries.lock().unwrap().insert(*id, data.to_vec());
        Ok(())
    }

    fn get_entry(&self, id: &ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.lock().unwrap().get(id).cloned())
    }

    fn iter_entries(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|(id, data)| (*id, data.clone()))
            .collect())
    }

    fn get_timelock_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.timelock_meta.lock().unwrap().get(key).cloned())
    }

    fn put_timelock_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.timelock_meta
            .lock()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        self.meta.lock().unwrap().remove(key);
        Ok(())
    }
}
