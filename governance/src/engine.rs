//! The governance engine — single-writer facade over the proposal registry,
//! voting ledger, tally engine, and timelock scheduler.

use crate::error::GovernorError;
use crate::proposal::{hash_proposal, zip_actions, Proposal};
use crate::tally::{mul_div, VoteReceipt, VoteTally};
use agora_store::{MetaStore, ProposalStore, TimelockStore, VoteStore};
use agora_timelock::{ActionDispatcher, Capability, TimelockScheduler};
use agora_types::{
    Account, DescriptionHash, GovernorParams, ProposalId, ProposalState, Timestamp, VoteSupport,
};
use agora_votes::VotesLedger;
use std::collections::HashMap;

const PARAMS_META_KEY: &str = "governor_params";

/// The governance engine.
///
/// Every state-changing operation takes `&mut self` and a caller-supplied
/// `now` — the single-writer transactional boundary of the ledger. Reads
/// are pure functions of the records and `now`; the engine never consults
/// a clock of its own.
pub struct GovernorEngine {
    params: GovernorParams,
    votes: VotesLedger,
    timelock: TimelockScheduler,
    proposals: HashMap<ProposalId, Proposal>,
    tallies: HashMap<ProposalId, VoteTally>,
}

impl GovernorEngine {
    /// Create an engine with an empty ledger; `admin` bootstraps the
    /// timelock capability set.
    pub fn new(params: GovernorParams, admin: Account) -> Self {
        let timelock = TimelockScheduler::new(
            params.timelock_min_delay_secs,
            params.execution_grace_period_secs,
            admin,
        );
        Self {
            params,
            votes: VotesLedger::new(),
            timelock,
            proposals: HashMap::new(),
            tallies: HashMap::new(),
        }
    }

    /// Assemble an engine from existing components.
    pub fn with_components(
        params: GovernorParams,
        votes: VotesLedger,
        timelock: TimelockScheduler,
    ) -> Self {
        Self {
            params,
            votes,
            timelock,
            proposals: HashMap::new(),
            tallies: HashMap::new(),
        }
    }

    // ── Configuration ────────────────────────────────────────────────────

    pub fn params(&self) -> &GovernorParams {
        &self.params
    }

    /// Seconds between proposal creation and the start of voting.
    pub fn voting_delay(&self) -> u64 {
        self.params.voting_delay_secs
    }

    /// Seconds the voting window stays open.
    pub fn voting_period(&self) -> u64 {
        self.params.voting_period_secs
    }

    pub fn quorum_numerator(&self) -> u32 {
        self.params.quorum_numerator
    }

    pub fn quorum_denominator(&self) -> u32 {
        self.params.quorum_denominator
    }

    // ── Component access ─────────────────────────────────────────────────

    pub fn votes(&self) -> &VotesLedger {
        &self.votes
    }

    pub fn votes_mut(&mut self) -> &mut VotesLedger {
        &mut self.votes
    }

    pub fn timelock(&self) -> &TimelockScheduler {
        &self.timelock
    }

    pub fn timelock_mut(&mut self) -> &mut TimelockScheduler {
        &mut self.timelock
    }

    // ── Proposal registry ────────────────────────────────────────────────

    /// Compute the identifier the engine would assign to this payload.
    /// Pure — requires no ledger state.
    pub fn proposal_id(
        targets: Vec<Account>,
        values: Vec<u128>,
        payloads: Vec<Vec<u8>>,
        description_hash: &DescriptionHash,
    ) -> Result<ProposalId, GovernorError> {
        let actions = zip_actions(targets, values, payloads)?;
        Ok(hash_proposal(&actions, description_hash))
    }

    /// Register a new proposal. Voting opens `voting_delay` after `now` and
    /// stays open for `voting_period`.
    pub fn propose(
        &mut self,
        proposer: &Account,
        targets: Vec<Account>,
        values: Vec<u128>,
        payloads: Vec<Vec<u8>>,
        description: &str,
        now: Timestamp,
    ) -> Result<ProposalId, GovernorError> {
        let actions = zip_actions(targets, values, payloads)?;
        let description_hash = agora_crypto::hash_description(description);
        let id = hash_proposal(&actions, &description_hash);
        if self.proposals.contains_key(&id) {
            return Err(GovernorError::AlreadyProposed(id));
        }

        let vote_start = now.plus_secs(self.params.voting_delay_secs);
        let vote_end = vote_start.plus_secs(self.params.voting_period_secs);
        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer: proposer.clone(),
                actions,
                description: description.to_string(),
                created_at: now,
                vote_start,
                vote_end,
                canceled: false,
            },
        );
        self.tallies.insert(id, VoteTally::new());
        tracing::info!(proposal = %id, proposer = %proposer, %vote_start, %vote_end, "proposal created");
        Ok(id)
    }

    /// Look up a registered proposal.
    pub fn proposal(&self, id: &ProposalId) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    /// The weight/quorum snapshot timepoint (the voting-window start).
    pub fn proposal_snapshot(&self, id: &ProposalId) -> Result<Timestamp, GovernorError> {
        self.proposals
            .get(id)
            .map(|p| p.vote_start)
            .ok_or(GovernorError::ProposalNotFound(*id))
    }

    /// The voting deadline (inclusive).
    pub fn proposal_deadline(&self, id: &ProposalId) -> Result<Timestamp, GovernorError> {
        self.proposals
            .get(id)
            .map(|p| p.vote_end)
            .ok_or(GovernorError::ProposalNotFound(*id))
    }

    // ── Voting ledger ────────────────────────────────────────────────────

    /// Cast a vote. Returns the weight recorded: the voter's delegated
    /// weight at the proposal snapshot.
    pub fn cast_vote(
        &mut self,
        id: &ProposalId,
        voter: &Account,
        support: VoteSupport,
        now: Timestamp,
    ) -> Result<u128, GovernorError> {
        let snapshot = self
            .proposals
            .get(id)
            .ok_or(GovernorError::ProposalNotFound(*id))?
            .vote_start;
        if self.state(id, now)? != ProposalState::Active {
            return Err(GovernorError::VotingClosed);
        }
        let weight = self.votes.past_votes(voter, snapshot);
        let tally = self
            .tallies
            .get_mut(id)
            .ok_or(GovernorError::ProposalNotFound(*id))?;
        tally.record(voter.clone(), support, weight, now)?;
        tracing::debug!(proposal = %id, voter = %voter, support = support.as_u8(), weight, "vote cast");
        Ok(weight)
    }

    /// Whether `account` has voted on the proposal.
    pub fn has_voted(&self, id: &ProposalId, account: &Account) -> Result<bool, GovernorError> {
        self.tallies
            .get(id)
            .map(|t| t.has_voted(account))
            .ok_or(GovernorError::ProposalNotFound(*id))
    }

    // ── Quorum / tally ───────────────────────────────────────────────────

    /// Aggregated (against, for, abstain) weights.
    pub fn proposal_votes(
        &self,
        id: &ProposalId,
    ) -> Result<(u128, u128, u128), GovernorError> {
        self.tallies
            .get(id)
            .map(|t| (t.against_votes, t.for_votes, t.abstain_votes))
            .ok_or(GovernorError::ProposalNotFound(*id))
    }

    /// Minimum participating weight required at `timepoint`: the quorum
    /// fraction of the token supply snapshotted then.
    pub fn quorum(&self, timepoint: Timestamp) -> u128 {
        if self.params.quorum_denominator == 0 {
            return 0;
        }
        mul_div(
            self.votes.past_total_supply(timepoint),
            self.params.quorum_numerator,
            self.params.quorum_denominator,
        )
    }

    // ── Timelock ─────────────────────────────────────────────────────────

    /// Queue a succeeded proposal for execution at its voting deadline plus
    /// the minimum delay. `by` must hold the Proposer capability.
    pub fn queue(
        &mut self,
        targets: Vec<Account>,
        values: Vec<u128>,
        payloads: Vec<Vec<u8>>,
        description_hash: &DescriptionHash,
        by: &Account,
        now: Timestamp,
    ) -> Result<Timestamp, GovernorError> {
        let actions = zip_actions(targets, values, payloads)?;
        let id = hash_proposal(&actions, description_hash);
        let vote_end = self
            .proposals
            .get(&id)
            .ok_or(GovernorError::ProposalNotFound(id))?
            .vote_end;
        let state = self.state(&id, now)?;
        if state != ProposalState::Succeeded {
            return Err(GovernorError::NotSucceeded(state));
        }
        let eta = vote_end.plus_secs(self.params.timelock_min_delay_secs);
        self.timelock.schedule(id, eta, by, now)?;
        tracing::info!(proposal = %id, %eta, "proposal queued for execution");
        Ok(eta)
    }

    /// Execute a queued proposal once its delay has elapsed. The recorded
    /// action batch is dispatched atomically; the proposal is marked
    /// executed at most once. `by` must hold the Executor capability.
    pub fn execute(
        &mut self,
        targets: Vec<Account>,
        values: Vec<u128>,
        payloads: Vec<Vec<u8>>,
        description_hash: &DescriptionHash,
        dispatcher: &mut dyn ActionDispatcher,
        by: &Account,
        now: Timestamp,
    ) -> Result<(), GovernorError> {
        let presented = zip_actions(targets, values, payloads)?;
        let id = hash_proposal(&presented, description_hash);
        // Execute the recorded actions; by content addressing they are
        // identical to the presented ones.
        let actions = self
            .proposals
            .get(&id)
            .ok_or(GovernorError::ProposalNotFound(id))?
            .actions
            .clone();
        self.timelock.execute(&id, &actions, dispatcher, by, now)?;
        Ok(())
    }

    /// Withdraw a proposal before voting starts. Only the proposer or a
    /// timelock admin may cancel.
    pub fn cancel(
        &mut self,
        targets: Vec<Account>,
        values: Vec<u128>,
        payloads: Vec<Vec<u8>>,
        description_hash: &DescriptionHash,
        by: &Account,
        now: Timestamp,
    ) -> Result<(), GovernorError> {
        let actions = zip_actions(targets, values, payloads)?;
        let id = hash_proposal(&actions, description_hash);
        let state = self.state(&id, now)?;
        if state != ProposalState::Pending {
            return Err(GovernorError::TooLateToCancel(state));
        }
        let is_proposer = self
            .proposals
            .get(&id)
            .map(|p| &p.proposer == by)
            .unwrap_or(false);
        if !is_proposer && !self.timelock.has_role(Capability::Admin, by) {
            return Err(GovernorError::UnauthorizedCancel);
        }
        if let Some(p) = self.proposals.get_mut(&id) {
            p.canceled = true;
        }
        tracing::info!(proposal = %id, by = %by, "proposal canceled");
        Ok(())
    }

    // ── State machine ────────────────────────────────────────────────────

    /// Derive the proposal's phase from its records and `now`. Pure: no
    /// stored transition flags beyond the vote/queue/execute/cancel
    /// records.
    pub fn state(&self, id: &ProposalId, now: Timestamp) -> Result<ProposalState, GovernorError> {
        let proposal = self
            .proposals
            .get(id)
            .ok_or(GovernorError::ProposalNotFound(*id))?;
        if proposal.canceled {
            return Ok(ProposalState::Canceled);
        }
        if let Some(entry) = self.timelock.entry(id) {
            if entry.executed {
                return Ok(ProposalState::Executed);
            }
            return Ok(if now > self.timelock.expiry_deadline(entry.eta) {
                ProposalState::Expired
            } else {
                ProposalState::Queued
            });
        }
        if now < proposal.vote_start {
            return Ok(ProposalState::Pending);
        }
        if now <= proposal.vote_end {
            return Ok(ProposalState::Active);
        }
        let tally = self
            .tallies
            .get(id)
            .ok_or(GovernorError::ProposalNotFound(*id))?;
        let quorum = self.quorum(proposal.vote_start);
        if !tally.vote_succeeded() || !tally.quorum_reached(quorum) {
            return Ok(ProposalState::Defeated);
        }
        // Succeeded-but-never-queued proposals lapse at the same instant a
        // queued-but-never-executed one would.
        let eta = proposal
            .vote_end
            .plus_secs(self.params.timelock_min_delay_secs);
        if now > self.timelock.expiry_deadline(eta) {
            Ok(ProposalState::Expired)
        } else {
            Ok(ProposalState::Succeeded)
        }
    }

    // ── Persistence ──────────────────────────────────────────────────────

    /// Persist the full engine state through the store traits.
    pub fn save_to_store<S>(&self, store: &S) -> Result<(), GovernorError>
    where
        S: ProposalStore + VoteStore + TimelockStore + MetaStore,
    {
        for (id, proposal) in &self.proposals {
            let bytes = bincode::serialize(proposal)
                .map_err(|e| GovernorError::Store(e.to_string()))?;
            store
                .put_proposal(id, &bytes)
                .map_err(|e| GovernorError::Store(e.to_string()))?;
        }
        for (id, tally) in &self.tallies {
            for (voter, receipt) in tally.receipts() {
                let bytes = bincode::serialize(receipt)
                    .map_err(|e| GovernorError::Store(e.to_string()))?;
                store
                    .put_vote(id, voter, &bytes)
                    .map_err(|e| GovernorError::Store(e.to_string()))?;
            }
        }
        self.timelock.save_to_store(store)?;
        store
            .put_meta(VotesLedger::meta_key(), &self.votes.save_state())
            .map_err(|e| GovernorError::Store(e.to_string()))?;
        let params_bytes = bincode::serialize(&self.params)
            .map_err(|e| GovernorError::Store(e.to_string()))?;
        store
            .put_meta(PARAMS_META_KEY, &params_bytes)
            .map_err(|e| GovernorError::Store(e.to_string()))?;
        Ok(())
    }

    /// Restore an engine from a store. Tallies are rebuilt from the stored
    /// receipts.
    pub fn load_from_store<S>(store: &S) -> Result<Self, GovernorError>
    where
        S: ProposalStore + VoteStore + TimelockStore + MetaStore,
    {
        let params_bytes = store
            .get_meta(PARAMS_META_KEY)
            .map_err(|e| GovernorError::Store(e.to_string()))?
            .ok_or_else(|| GovernorError::Store("governor params not found".into()))?;
        let params: GovernorParams = bincode::deserialize(&params_bytes)
            .map_err(|e| GovernorError::Store(e.to_string()))?;

        let votes = match store
            .get_meta(VotesLedger::meta_key())
            .map_err(|e| GovernorError::Store(e.to_string()))?
        {
            Some(bytes) => VotesLedger::load_state(&bytes),
            None => VotesLedger::new(),
        };

        let timelock = TimelockScheduler::load_from_store(store)?;

        let mut proposals = HashMap::new();
        let mut tallies = HashMap::new();
        for (id, bytes) in store
            .iter_proposals()
            .map_err(|e| GovernorError::Store(e.to_string()))?
        {
            let proposal: Proposal = bincode::deserialize(&bytes)
                .map_err(|e| GovernorError::Store(e.to_string()))?;
            let mut tally = VoteTally::new();
            for (voter, receipt_bytes) in store
                .iter_votes(&id)
                .map_err(|e| GovernorError::Store(e.to_string()))?
            {
                let receipt: VoteReceipt = bincode::deserialize(&receipt_bytes)
                    .map_err(|e| GovernorError::Store(e.to_string()))?;
                tally.record(voter, receipt.support, receipt.weight, receipt.cast_at)?;
            }
            proposals.insert(id, proposal);
            tallies.insert(id, tally);
        }

        Ok(Self {
            params,
            votes,
            timelock,
            proposals,
            tallies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_timelock::{DispatchError, TimelockError};
    use agora_types::Action;

    fn account(name: &str) -> Account {
        Account::new(format!("agr_{}", name))
    }

    fn at(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    struct RecordingDispatcher {
        batches: Vec<Vec<Action>>,
    }

    impl RecordingDispatcher {
        fn new() -> Self {
            Self { batches: Vec::new() }
        }
    }

    impl ActionDispatcher for RecordingDispatcher {
        fn execute_batch(&mut self, actions: &[Action]) -> Result<(), DispatchError> {
            self.batches.push(actions.to_vec());
            Ok(())
        }
    }

    /// Dev-params engine with `agr_ops` holding Proposer + Executor.
    fn dev_engine() -> (GovernorEngine, Account, Account) {
        let admin = account("admin");
        let ops = account("ops");
        let mut engine = GovernorEngine::new(GovernorParams::dev_defaults(), admin.clone());
        engine
            .timelock_mut()
            .grant_role(Capability::Proposer, ops.clone(), &admin)
            .unwrap();
        engine
            .timelock_mut()
            .grant_role(Capability::Executor, ops.clone(), &admin)
            .unwrap();
        (engine, admin, ops)
    }

    /// Mint `weight` to `count` self-delegated voters at t=0.
    fn seed_voters(engine: &mut GovernorEngine, count: usize, weight: u128) -> Vec<Account> {
        let voters: Vec<Account> = (0..count).map(|i| account(&format!("voter{}", i))).collect();
        for voter in &voters {
            engine.votes_mut().mint(voter, weight, at(0)).unwrap();
            engine.votes_mut().delegate(voter, voter, at(0)).unwrap();
        }
        voters
    }

    fn payload() -> (Vec<Account>, Vec<u128>, Vec<Vec<u8>>, &'static str) {
        (
            vec![account("target")],
            vec![0],
            vec![b"take_off".to_vec()],
            "start takeoff",
        )
    }

    fn propose_default(engine: &mut GovernorEngine, now: Timestamp) -> ProposalId {
        let (targets, values, payloads, description) = payload();
        engine
            .propose(&account("proposer"), targets, values, payloads, description, now)
            .unwrap()
    }

    #[test]
    fn propose_assigns_content_address() {
        let (mut engine, _admin, _ops) = dev_engine();
        let id = propose_default(&mut engine, at(10));

        let (targets, values, payloads, description) = payload();
        let expected = GovernorEngine::proposal_id(
            targets,
            values,
            payloads,
            &agora_crypto::hash_description(description),
        )
        .unwrap();
        assert_eq!(id, expected);

        let proposal = engine.proposal(&id).unwrap();
        assert_eq!(proposal.vote_start, at(70));
        assert_eq!(proposal.vote_end, at(670));
        assert_eq!(engine.state(&id, at(10)).unwrap(), ProposalState::Pending);
    }

    #[test]
    fn propose_duplicate_rejected() {
        let (mut engine, _admin, _ops) = dev_engine();
        propose_default(&mut engine, at(10));
        let (targets, values, payloads, description) = payload();
        let err = engine
            .propose(&account("other"), targets, values, payloads, description, at(20))
            .unwrap_err();
        assert!(matches!(err, GovernorError::AlreadyProposed(_)));
    }

    #[test]
    fn propose_validates_input() {
        let (mut engine, _admin, _ops) = dev_engine();
        let err = engine
            .propose(&account("p"), vec![], vec![], vec![], "empty", at(0))
            .unwrap_err();
        assert!(matches!(err, GovernorError::EmptyProposal));

        let err = engine
            .propose(
                &account("p"),
                vec![account("t")],
                vec![0, 1],
                vec![vec![]],
                "mismatch",
                at(0),
            )
            .unwrap_err();
        assert!(matches!(err, GovernorError::LengthMismatch { .. }));
    }

    #[test]
    fn vote_outside_window_rejected() {
        let (mut engine, _admin, _ops) = dev_engine();
        let voters = seed_voters(&mut engine, 1, 100);
        let id = propose_default(&mut engine, at(10));

        // Before the window.
        let err = engine
            .cast_vote(&id, &voters[0], VoteSupport::For, at(69))
            .unwrap_err();
        assert!(matches!(err, GovernorError::VotingClosed));

        // After the deadline.
        let err = engine
            .cast_vote(&id, &voters[0], VoteSupport::For, at(671))
            .unwrap_err();
        assert!(matches!(err, GovernorError::VotingClosed));
    }

    #[test]
    fn vote_weight_is_snapshotted() {
        let (mut engine, _admin, _ops) = dev_engine();
        let voters = seed_voters(&mut engine, 2, 100);
        let id = propose_default(&mut engine, at(10));

        // Transfer away after the snapshot (vote_start = 70).
        engine
            .votes_mut()
            .transfer(&voters[0], &voters[1], 100, at(100))
            .unwrap();

        let weight = engine
            .cast_vote(&id, &voters[0], VoteSupport::For, at(200))
            .unwrap();
        assert_eq!(weight, 100);

        // Weight minted after the snapshot does not count.
        let late = account("latecomer");
        engine.votes_mut().mint(&late, 500, at(300)).unwrap();
        engine.votes_mut().delegate(&late, &late, at(300)).unwrap();
        let weight = engine
            .cast_vote(&id, &late, VoteSupport::For, at(400))
            .unwrap();
        assert_eq!(weight, 0);
        assert!(engine.has_voted(&id, &late).unwrap());
    }

    #[test]
    fn duplicate_vote_rejected() {
        let (mut engine, _admin, _ops) = dev_engine();
        let voters = seed_voters(&mut engine, 1, 100);
        let id = propose_default(&mut engine, at(10));

        engine
            .cast_vote(&id, &voters[0], VoteSupport::For, at(100))
            .unwrap();
        let err = engine
            .cast_vote(&id, &voters[0], VoteSupport::Against, at(101))
            .unwrap_err();
        assert!(matches!(err, GovernorError::AlreadyVoted(_)));
        assert_eq!(engine.proposal_votes(&id).unwrap(), (0, 100, 0));
    }

    #[test]
    fn quorum_follows_snapshotted_supply() {
        let (mut engine, _admin, _ops) = dev_engine();
        seed_voters(&mut engine, 10, 100);
        assert_eq!(engine.quorum(at(0)), 400); // 40% of 1000

        engine.votes_mut().mint(&account("later"), 1000, at(50)).unwrap();
        assert_eq!(engine.quorum(at(0)), 400);
        assert_eq!(engine.quorum(at(50)), 800);
    }

    #[test]
    fn queue_requires_succeeded() {
        let (mut engine, _admin, ops) = dev_engine();
        let voters = seed_voters(&mut engine, 10, 100);
        let id = propose_default(&mut engine, at(10));

        // Active: not queueable even with a winning tally so far.
        for voter in voters.iter().take(5) {
            engine.cast_vote(&id, voter, VoteSupport::For, at(100)).unwrap();
        }
        let (targets, values, payloads, description) = payload();
        let err = engine
            .queue(
                targets,
                values,
                payloads,
                &agora_crypto::hash_description(description),
                &ops,
                at(100),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GovernorError::NotSucceeded(ProposalState::Active)
        ));
    }

    #[test]
    fn queue_rejected_when_quorum_unmet() {
        let (mut engine, _admin, ops) = dev_engine();
        let voters = seed_voters(&mut engine, 10, 100);
        let id = propose_default(&mut engine, at(10));

        // 300 participating < 400 quorum.
        for voter in voters.iter().take(3) {
            engine.cast_vote(&id, voter, VoteSupport::For, at(100)).unwrap();
        }
        assert_eq!(engine.state(&id, at(671)).unwrap(), ProposalState::Defeated);

        let (targets, values, payloads, description) = payload();
        let err = engine
            .queue(
                targets,
                values,
                payloads,
                &agora_crypto::hash_description(description),
                &ops,
                at(671),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GovernorError::NotSucceeded(ProposalState::Defeated)
        ));
    }

    #[test]
    fn queue_rejected_when_for_does_not_exceed_against() {
        let (mut engine, _admin, _ops) = dev_engine();
        let voters = seed_voters(&mut engine, 10, 100);
        let id = propose_default(&mut engine, at(10));

        // 500 for, 500 against: quorum met, majority not strict.
        for voter in voters.iter().take(5) {
            engine.cast_vote(&id, voter, VoteSupport::For, at(100)).unwrap();
        }
        for voter in voters.iter().skip(5) {
            engine.cast_vote(&id, voter, VoteSupport::Against, at(100)).unwrap();
        }
        assert_eq!(engine.state(&id, at(671)).unwrap(), ProposalState::Defeated);
    }

    #[test]
    fn queue_and_execute_happy_path() {
        let (mut engine, _admin, ops) = dev_engine();
        let voters = seed_voters(&mut engine, 10, 100);
        let id = propose_default(&mut engine, at(10));

        for voter in voters.iter().take(5) {
            engine.cast_vote(&id, voter, VoteSupport::For, at(100)).unwrap();
        }
        assert_eq!(engine.state(&id, at(671)).unwrap(), ProposalState::Succeeded);

        let (targets, values, payloads, description) = payload();
        let desc_hash = agora_crypto::hash_description(description);
        let eta = engine
            .queue(targets, values, payloads, &desc_hash, &ops, at(671))
            .unwrap();
        assert_eq!(eta, at(680)); // vote_end 670 + min delay 10
        assert_eq!(engine.state(&id, at(672)).unwrap(), ProposalState::Queued);

        // Delay not elapsed.
        let mut dispatcher = RecordingDispatcher::new();
        let (targets, values, payloads, _) = payload();
        let err = engine
            .execute(targets, values, payloads, &desc_hash, &mut dispatcher, &ops, at(675))
            .unwrap_err();
        assert!(matches!(
            err,
            GovernorError::Timelock(TimelockError::DelayNotElapsed { .. })
        ));

        let (targets, values, payloads, _) = payload();
        engine
            .execute(targets, values, payloads, &desc_hash, &mut dispatcher, &ops, at(681))
            .unwrap();
        assert_eq!(engine.state(&id, at(681)).unwrap(), ProposalState::Executed);
        assert_eq!(dispatcher.batches.len(), 1);
        assert_eq!(dispatcher.batches[0][0].payload, b"take_off");

        // Exactly once.
        let (targets, values, payloads, _) = payload();
        let err = engine
            .execute(targets, values, payloads, &desc_hash, &mut dispatcher, &ops, at(682))
            .unwrap_err();
        assert!(matches!(
            err,
            GovernorError::Timelock(TimelockError::AlreadyExecuted(_))
        ));
    }

    #[test]
    fn unqueued_success_expires_with_the_grace_period() {
        let (mut engine, _admin, ops) = dev_engine();
        let voters = seed_voters(&mut engine, 10, 100);
        let id = propose_default(&mut engine, at(10));
        for voter in voters.iter().take(5) {
            engine.cast_vote(&id, voter, VoteSupport::For, at(100)).unwrap();
        }

        // Expiry deadline: vote_end 670 + delay 10 + grace 3600 = 4280.
        assert_eq!(engine.state(&id, at(4280)).unwrap(), ProposalState::Succeeded);
        assert_eq!(engine.state(&id, at(4281)).unwrap(), ProposalState::Expired);

        let (targets, values, payloads, description) = payload();
        let err = engine
            .queue(
                targets,
                values,
                payloads,
                &agora_crypto::hash_description(description),
                &ops,
                at(4281),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GovernorError::NotSucceeded(ProposalState::Expired)
        ));
    }

    #[test]
    fn queued_proposal_expires_unexecuted() {
        let (mut engine, _admin, ops) = dev_engine();
        let voters = seed_voters(&mut engine, 10, 100);
        let id = propose_default(&mut engine, at(10));
        for voter in voters.iter().take(5) {
            engine.cast_vote(&id, voter, VoteSupport::For, at(100)).unwrap();
        }

        let (targets, values, payloads, description) = payload();
        let desc_hash = agora_crypto::hash_description(description);
        engine
            .queue(targets, values, payloads, &desc_hash, &ops, at(671))
            .unwrap();

        assert_eq!(engine.state(&id, at(4280)).unwrap(), ProposalState::Queued);
        assert_eq!(engine.state(&id, at(4281)).unwrap(), ProposalState::Expired);

        let mut dispatcher = RecordingDispatcher::new();
        let (targets, values, payloads, _) = payload();
        let err = engine
            .execute(targets, values, payloads, &desc_hash, &mut dispatcher, &ops, at(4281))
            .unwrap_err();
        assert!(matches!(
            err,
            GovernorError::Timelock(TimelockError::LapsedUnexecuted(_))
        ));
    }

    #[test]
    fn cancel_only_while_pending() {
        let (mut engine, admin, _ops) = dev_engine();
        seed_voters(&mut engine, 1, 100);
        let id = propose_default(&mut engine, at(10));
        let (targets, values, payloads, description) = payload();
        let desc_hash = agora_crypto::hash_description(description);

        // A stranger cannot cancel.
        let err = engine
            .cancel(
                targets.clone(),
                values.clone(),
                payloads.clone(),
                &desc_hash,
                &account("stranger"),
                at(20),
            )
            .unwrap_err();
        assert!(matches!(err, GovernorError::UnauthorizedCancel));

        // The timelock admin can.
        engine
            .cancel(targets, values, payloads, &desc_hash, &admin, at(20))
            .unwrap();
        assert_eq!(engine.state(&id, at(20)).unwrap(), ProposalState::Canceled);
        assert_eq!(engine.state(&id, at(100)).unwrap(), ProposalState::Canceled);
    }

    #[test]
    fn cancel_by_proposer_then_voting_rejected() {
        let (mut engine, _admin, _ops) = dev_engine();
        let voters = seed_voters(&mut engine, 1, 100);
        let id = propose_default(&mut engine, at(10));
        let (targets, values, payloads, description) = payload();
        let desc_hash = agora_crypto::hash_description(description);

        engine
            .cancel(targets, values, payloads, &desc_hash, &account("proposer"), at(20))
            .unwrap();
        let err = engine
            .cast_vote(&id, &voters[0], VoteSupport::For, at(100))
            .unwrap_err();
        assert!(matches!(err, GovernorError::VotingClosed));
    }

    #[test]
    fn cancel_after_voting_starts_rejected() {
        let (mut engine, _admin, _ops) = dev_engine();
        propose_default(&mut engine, at(10));
        let (targets, values, payloads, description) = payload();
        let desc_hash = agora_crypto::hash_description(description);

        let err = engine
            .cancel(targets, values, payloads, &desc_hash, &account("proposer"), at(70))
            .unwrap_err();
        assert!(matches!(
            err,
            GovernorError::TooLateToCancel(ProposalState::Active)
        ));
    }

    #[test]
    fn reads_on_unknown_proposal_fail() {
        let (engine, _admin, _ops) = dev_engine();
        let unknown = ProposalId::new([7; 32]);
        assert!(matches!(
            engine.state(&unknown, at(0)),
            Err(GovernorError::ProposalNotFound(_))
        ));
        assert!(matches!(
            engine.proposal_votes(&unknown),
            Err(GovernorError::ProposalNotFound(_))
        ));
        assert!(matches!(
            engine.has_voted(&unknown, &account("a")),
            Err(GovernorError::ProposalNotFound(_))
        ));
    }
}
