//! Persist a live engine to LMDB, reopen the environment, and restore it.

use agora_governance::GovernorEngine;
use agora_store_lmdb::LmdbGovernanceStore;
use agora_timelock::Capability;
use agora_types::{Account, GovernorParams, ProposalState, Timestamp, VoteSupport};

fn account(name: &str) -> Account {
    Account::new(format!("agr_{}", name))
}

fn at(secs: u64) -> Timestamp {
    Timestamp::new(secs)
}

#[test]
fn engine_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let admin = account("admin");

    let mut engine = GovernorEngine::new(GovernorParams::dev_defaults(), admin.clone());
    engine
        .timelock_mut()
        .grant_role(Capability::Proposer, admin.clone(), &admin)
        .unwrap();

    let voters: Vec<Account> = (0..5).map(|i| account(&format!("voter{}", i))).collect();
    for voter in &voters {
        engine.votes_mut().mint(voter, 100, at(0)).unwrap();
        engine.votes_mut().delegate(voter, voter, at(0)).unwrap();
    }

    let id = engine
        .propose(
            &admin,
            vec![account("target")],
            vec![0],
            vec![b"take_off".to_vec()],
            "start takeoff",
            at(10),
        )
        .unwrap();
    for voter in &voters[..3] {
        engine.cast_vote(&id, voter, VoteSupport::For, at(100)).unwrap();
    }
    engine
        .cast_vote(&id, &voters[3], VoteSupport::Against, at(100))
        .unwrap();

    {
        let store = LmdbGovernanceStore::open(dir.path(), 10 * 1024 * 1024).unwrap();
        engine.save_to_store(&store).unwrap();
    }

    let store = LmdbGovernanceStore::open(dir.path(), 10 * 1024 * 1024).unwrap();
    let restored = GovernorEngine::load_from_store(&store).unwrap();

    assert_eq!(restored.proposal_votes(&id).unwrap(), (100, 300, 0));
    assert!(restored.has_voted(&id, &voters[0]).unwrap());
    assert!(!restored.has_voted(&id, &voters[4]).unwrap());
    assert_eq!(restored.state(&id, at(100)).unwrap(), ProposalState::Active);
    // Supply snapshot restored: quorum is 40% of 500.
    assert_eq!(restored.quorum(at(0)), 200);
    // Role membership restored.
    assert!(restored
        .timelock()
        .has_role(Capability::Proposer, &admin));
}
