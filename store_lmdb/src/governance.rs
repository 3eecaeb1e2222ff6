//! LMDB implementation of the governance store traits.

use agora_store::{MetaStore, ProposalStore, StoreError, TimelockStore, VoteStore};
use agora_types::{Account, ProposalId};

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

/// One LMDB environment implementing every governance store trait.
///
/// Vote receipts are keyed by the 32-byte proposal id followed by the voter
/// account string, so all receipts of a proposal share a key prefix.
#[derive(Clone)]
pub struct LmdbGovernanceStore {
    env: LmdbEnvironment,
}

impl LmdbGovernanceStore {
    pub fn new(env: LmdbEnvironment) -> Self {
        Self { env }
    }

    /// Open an environment at `path` and wrap it.
    pub fn open(path: &std::path::Path, map_size: usize) -> Result<Self, LmdbError> {
        Ok(Self::new(LmdbEnvironment::open(path, map_size)?))
    }

    fn vote_key(proposal: &ProposalId, voter: &Account) -> Vec<u8> {
        let voter_bytes = voter.as_str().as_bytes();
        let mut key = Vec::with_capacity(32 + voter_bytes.len());
        key.extend_from_slice(proposal.as_bytes());
        key.extend_from_slice(voter_bytes);
        key
    }

    fn proposal_id_from_key(key: &[u8]) -> Result<ProposalId, StoreError> {
        let bytes: [u8; 32] = key
            .get(..32)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| StoreError::Corruption("key shorter than a proposal id".into()))?;
        Ok(ProposalId::new(bytes))
    }
}

impl ProposalStore for LmdbGovernanceStore {
    fn put_proposal(&self, id: &ProposalId, data: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.env.write_txn().map_err(LmdbError::from)?;
        self.env
            .proposals_db
            .put(&mut wtxn, id.as_bytes(), data)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_proposal(&self, id: &ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .env
            .proposals_db
            .get(&rtxn, id.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn delete_proposal(&self, id: &ProposalId) -> Result<(), StoreError> {
        let mut wtxn = self.env.env.write_txn().map_err(LmdbError::from)?;
        self.env
            .proposals_db
            .delete(&mut wtxn, id.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_proposals(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        let iter = self.env.proposals_db.iter(&rtxn).map_err(LmdbError::from)?;
        for item in iter {
            let (key, value) = item.map_err(LmdbError::from)?;
            results.push((Self::proposal_id_from_key(key)?, value.to_vec()));
        }
        Ok(results)
    }
}

impl VoteStore for LmdbGovernanceStore {
    fn put_vote(
        &self,
        proposal: &ProposalId,
        voter: &Account,
        data: &[u8],
    ) -> Result<(), StoreError> {
        let key = Self::vote_key(proposal, voter);
        let mut wtxn = self.env.env.write_txn().map_err(LmdbError::from)?;
        self.env
            .votes_db
            .put(&mut wtxn, &key, data)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_vote(
        &self,
        proposal: &ProposalId,
        voter: &Account,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let key = Self::vote_key(proposal, voter);
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .env
            .votes_db
            .get(&rtxn, &key)
            .map_err(LmdbError::from)?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn iter_votes(&self, proposal: &ProposalId) -> Result<Vec<(Account, Vec<u8>)>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        let iter = self
            .env
            .votes_db
            .prefix_iter(&rtxn, proposal.as_bytes())
            .map_err(LmdbError::from)?;
        for item in iter {
            let (key, value) = item.map_err(LmdbError::from)?;
            let voter = std::str::from_utf8(&key[32..])
                .map_err(|e| StoreError::Corruption(e.to_string()))?;
            results.push((Account::new(voter.to_string()), value.to_vec()));
        }
        Ok(results)
    }
}

impl TimelockStore for LmdbGovernanceStore {
    fn put_entry(&self, id: &ProposalId, data: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.env.write_txn().map_err(LmdbError::from)?;
        self.env
            .timelock_db
            .put(&mut wtxn, id.as_bytes(), data)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_entry(&self, id: &ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .env
            .timelock_db
            .get(&rtxn, id.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn iter_entries(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        let iter = self.env.timelock_db.iter(&rtxn).map_err(LmdbError::from)?;
        for item in iter {
            let (key, value) = item.map_err(LmdbError::from)?;
            results.push((Self::proposal_id_from_key(key)?, value.to_vec()));
        }
        Ok(results)
    }

    fn get_timelock_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .env
            .timelock_meta_db
            .get(&rtxn, key)
            .map_err(LmdbError::from)?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn put_timelock_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.env.write_txn().map_err(LmdbError::from)?;
        self.env
            .timelock_meta_db
            .put(&mut wtxn, key, value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

impl MetaStore for LmdbGovernanceStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.env.write_txn().map_err(LmdbError::from)?;
        self.env
            .meta_db
            .put(&mut wtxn, key.as_bytes(), value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .env
            .meta_db
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.env.write_txn().map_err(LmdbError::from)?;
        self.env
            .meta_db
            .delete(&mut wtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store(dir: &std::path::Path) -> LmdbGovernanceStore {
        LmdbGovernanceStore::open(dir, 10 * 1024 * 1024).unwrap()
    }

    fn id(seed: u8) -> ProposalId {
        ProposalId::new([seed; 32])
    }

    fn account(name: &str) -> Account {
        Account::new(format!("agr_{}", name))
    }

    #[test]
    fn proposal_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());

        assert_eq!(store.get_proposal(&id(1)).unwrap(), None);
        store.put_proposal(&id(1), b"proposal one").unwrap();
        assert_eq!(
            store.get_proposal(&id(1)).unwrap(),
            Some(b"proposal one".to_vec())
        );

        store.delete_proposal(&id(1)).unwrap();
        assert_eq!(store.get_proposal(&id(1)).unwrap(), None);
    }

    #[test]
    fn iter_proposals_returns_all() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.put_proposal(&id(1), b"one").unwrap();
        store.put_proposal(&id(2), b"two").unwrap();

        let mut all = store.iter_proposals().unwrap();
        all.sort_by_key(|(id, _)| *id.as_bytes());
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].1, b"one");
        assert_eq!(all[1].1, b"two");
    }

    #[test]
    fn votes_isolated_per_proposal() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.put_vote(&id(1), &account("alice"), b"for").unwrap();
        store.put_vote(&id(1), &account("bob"), b"against").unwrap();
        store.put_vote(&id(2), &account("alice"), b"abstain").unwrap();

        assert_eq!(
            store.get_vote(&id(1), &account("alice")).unwrap(),
            Some(b"for".to_vec())
        );
        let mut votes = store.iter_votes(&id(1)).unwrap();
        votes.sort_by(|(a, _), (b, _)| a.cmp(b));
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].0, account("alice"));
        assert_eq!(votes[1].0, account("bob"));

        assert_eq!(store.iter_votes(&id(2)).unwrap().len(), 1);
        assert_eq!(store.iter_votes(&id(3)).unwrap().len(), 0);
    }

    #[test]
    fn timelock_entries_and_meta() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.put_entry(&id(1), b"entry").unwrap();
        store.put_timelock_meta(b"roles", b"role data").unwrap();

        assert_eq!(store.get_entry(&id(1)).unwrap(), Some(b"entry".to_vec()));
        assert_eq!(store.get_entry(&id(2)).unwrap(), None);
        assert_eq!(
            store.get_timelock_meta(b"roles").unwrap(),
            Some(b"role data".to_vec())
        );
        assert_eq!(store.iter_entries().unwrap().len(), 1);
    }

    #[test]
    fn meta_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.put_meta("governor_params", b"params").unwrap();
        assert_eq!(
            store.get_meta("governor_params").unwrap(),
            Some(b"params".to_vec())
        );
        store.delete_meta("governor_params").unwrap();
        assert_eq!(store.get_meta("governor_params").unwrap(), None);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open_store(dir.path());
            store.put_proposal(&id(1), b"persisted").unwrap();
        }
        let store = open_store(dir.path());
        assert_eq!(
            store.get_proposal(&id(1)).unwrap(),
            Some(b"persisted".to_vec())
        );
    }
}
