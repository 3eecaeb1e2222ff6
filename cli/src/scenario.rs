//! Scenario files — a deterministic, replayable sequence of governance
//! operations with explicit time.
//!
//! The engine never reads a clock; a scenario supplies every timestamp, so
//! a file replays to the identical result on every run.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use agora_governance::{GovernorEngine, GovernorError};
use agora_timelock::{ActionDispatcher, Capability, DispatchError};
use agora_types::{Account, Action, GovernorParams, ProposalId, Timestamp, VoteSupport};

/// The `toml` crate cannot deserialize directly into `u128` ("u128 is not
/// supported"), so scenario amounts are read as the 64-bit integers TOML
/// actually stores and widened. This preserves the `u128` fields the engine
/// API expects without changing the scenario file format.
fn de_u128<'de, D: serde::Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
    Ok(u64::deserialize(d)? as u128)
}

fn de_vec_u128<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Vec<u128>, D::Error> {
    Ok(Vec::<u64>::deserialize(d)?
        .into_iter()
        .map(|v| v as u128)
        .collect())
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Engine parameters; short dev windows when omitted.
    #[serde(default = "GovernorParams::dev_defaults")]
    pub params: GovernorParams,
    /// Timelock admin account.
    pub admin: String,
    /// Token distribution, applied at t=0.
    #[serde(default)]
    pub mints: Vec<Mint>,
    /// Delegations, applied at t=0 after minting.
    #[serde(default)]
    pub delegations: Vec<Delegation>,
    /// Capability grants, issued by the admin.
    #[serde(default)]
    pub roles: Vec<RoleGrant>,
    /// Timed governance operations; `at` must be non-decreasing.
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct Mint {
    pub account: String,
    #[serde(deserialize_with = "de_u128")]
    pub amount: u128,
}

#[derive(Debug, Deserialize)]
pub struct Delegation {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleGrant {
    pub capability: String,
    pub account: String,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    pub at: u64,
    #[serde(flatten)]
    pub op: Op,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Propose {
        proposer: String,
        description: String,
        targets: Vec<String>,
        #[serde(default, deserialize_with = "de_vec_u128")]
        values: Vec<u128>,
        /// Hex-encoded call payloads, one per target.
        #[serde(default)]
        payloads: Vec<String>,
    },
    Vote {
        voter: String,
        description: String,
        /// 0 = against, 1 = for, 2 = abstain.
        support: u8,
    },
    Queue {
        by: String,
        description: String,
    },
    Execute {
        by: String,
        description: String,
    },
    Cancel {
        by: String,
        description: String,
    },
}

impl Scenario {
    /// Load and parse a scenario file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse scenario file {}", path.display()))
    }
}

/// Final state of one proposal after replay.
#[derive(Debug, Serialize)]
pub struct ProposalReport {
    pub id: String,
    pub description: String,
    pub state: String,
    pub against: u128,
    #[serde(rename = "for")]
    pub for_votes: u128,
    pub abstain: u128,
    pub quorum: u128,
}

/// The replay outcome, reported at the final step's timestamp.
#[derive(Debug, Serialize)]
pub struct Report {
    pub final_time: u64,
    pub proposals: Vec<ProposalReport>,
}

/// Logs each executed action instead of calling into an external system.
struct LoggingDispatcher;

impl ActionDispatcher for LoggingDispatcher {
    fn execute_batch(&mut self, actions: &[Action]) -> Result<(), DispatchError> {
        for action in actions {
            tracing::info!(
                to = %action.target,
                value = action.value,
                payload_len = action.payload.len(),
                "executing action"
            );
        }
        Ok(())
    }
}

pub(crate) fn parse_account(raw: &str) -> anyhow::Result<Account> {
    if !raw.starts_with(Account::PREFIX) {
        bail!("account '{raw}' must start with {}", Account::PREFIX);
    }
    Ok(Account::new(raw))
}

pub(crate) fn decode_hex(raw: &str) -> anyhow::Result<Vec<u8>> {
    if !raw.is_ascii() {
        bail!("hex payload contains non-ASCII characters: '{raw}'");
    }
    if raw.len() % 2 != 0 {
        bail!("hex payload has odd length: '{raw}'");
    }
    (0..raw.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&raw[i..i + 2], 16)
                .with_context(|| format!("invalid hex payload '{raw}'"))
        })
        .collect()
}

/// A proposal's payload, remembered by description for later steps.
struct KnownProposal {
    id: ProposalId,
    description: String,
    targets: Vec<Account>,
    values: Vec<u128>,
    payloads: Vec<Vec<u8>>,
}

/// Replay a scenario and report every proposal's final state.
pub fn replay(scenario: &Scenario) -> anyhow::Result<Report> {
    let admin = parse_account(&scenario.admin)?;
    let mut engine = GovernorEngine::new(scenario.params.clone(), admin.clone());
    tracing::info!(
        voting_delay = %agora_utils::format_duration(engine.voting_delay()),
        voting_period = %agora_utils::format_duration(engine.voting_period()),
        quorum = %format!("{}/{}", engine.quorum_numerator(), engine.quorum_denominator()),
        "engine configured"
    );

    for grant in &scenario.roles {
        let capability = match grant.capability.as_str() {
            "proposer" => Capability::Proposer,
            "executor" => Capability::Executor,
            "admin" => Capability::Admin,
            other => bail!("unknown capability '{other}'"),
        };
        let account = parse_account(&grant.account)?;
        engine
            .timelock_mut()
            .grant_role(capability, account, &admin)?;
    }

    let genesis = Timestamp::EPOCH;
    for mint in &scenario.mints {
        let account = parse_account(&mint.account)?;
        engine.votes_mut().mint(&account, mint.amount, genesis)?;
    }
    for delegation in &scenario.delegations {
        let from = parse_account(&delegation.from)?;
        let to = parse_account(&delegation.to)?;
        engine.votes_mut().delegate(&from, &to, genesis)?;
    }

    let mut known: Vec<KnownProposal> = Vec::new();
    let mut by_description: HashMap<String, usize> = HashMap::new();
    let mut last_at = 0u64;

    for (index, step) in scenario.steps.iter().enumerate() {
        if step.at < last_at {
            bail!(
                "step {} travels backwards in time ({} < {})",
                index + 1,
                step.at,
                last_at
            );
        }
        last_at = step.at;
        let now = Timestamp::new(step.at);

        match &step.op {
            Op::Propose {
                proposer,
                description,
                targets,
                values,
                payloads,
            } => {
                let proposer = parse_account(proposer)?;
                let targets = targets
                    .iter()
                    .map(|t| parse_account(t))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                let values = if values.is_empty() {
                    vec![0; targets.len()]
                } else {
                    values.clone()
                };
                let payloads = if payloads.is_empty() {
                    vec![Vec::new(); targets.len()]
                } else {
                    payloads
                        .iter()
                        .map(|p| decode_hex(p))
                        .collect::<anyhow::Result<Vec<_>>>()?
                };
                let id = engine.propose(
                    &proposer,
                    targets.clone(),
                    values.clone(),
                    payloads.clone(),
                    description,
                    now,
                )?;
                by_description.insert(description.clone(), known.len());
                known.push(KnownProposal {
                    id,
                    description: description.clone(),
                    targets,
                    values,
                    payloads,
                });
            }
            Op::Vote {
                voter,
                description,
                support,
            } => {
                let voter = parse_account(voter)?;
                let proposal = lookup(&known, &by_description, description)?;
                let support = VoteSupport::from_u8(*support)
                    .ok_or(GovernorError::InvalidSupport(*support))?;
                engine.cast_vote(&proposal.id, &voter, support, now)?;
            }
            Op::Queue { by, description } => {
                let by = parse_account(by)?;
                let proposal = lookup(&known, &by_description, description)?;
                engine.queue(
                    proposal.targets.clone(),
                    proposal.values.clone(),
                    proposal.payloads.clone(),
                    &agora_crypto::hash_description(&proposal.description),
                    &by,
                    now,
                )?;
            }
            Op::Execute { by, description } => {
                let by = parse_account(by)?;
                let proposal = lookup(&known, &by_description, description)?;
                engine.execute(
                    proposal.targets.clone(),
                    proposal.values.clone(),
                    proposal.payloads.clone(),
                    &agora_crypto::hash_description(&proposal.description),
                    &mut LoggingDispatcher,
                    &by,
                    now,
                )?;
            }
            Op::Cancel { by, description } => {
                let by = parse_account(by)?;
                let proposal = lookup(&known, &by_description, description)?;
                engine.cancel(
                    proposal.targets.clone(),
                    proposal.values.clone(),
                    proposal.payloads.clone(),
                    &agora_crypto::hash_description(&proposal.description),
                    &by,
                    now,
                )?;
            }
        }
    }

    let final_time = Timestamp::new(last_at);
    let mut proposals = Vec::with_capacity(known.len());
    for proposal in &known {
        let state = engine.state(&proposal.id, final_time)?;
        let (against, for_votes, abstain) = engine.proposal_votes(&proposal.id)?;
        let snapshot = engine.proposal_snapshot(&proposal.id)?;
        proposals.push(ProposalReport {
            id: proposal.id.to_string(),
            description: proposal.description.clone(),
            state: state.to_string(),
            against,
            for_votes,
            abstain,
            quorum: engine.quorum(snapshot),
        });
    }

    Ok(Report {
        final_time: last_at,
        proposals,
    })
}

fn lookup<'a>(
    known: &'a [KnownProposal],
    by_description: &HashMap<String, usize>,
    description: &str,
) -> anyhow::Result<&'a KnownProposal> {
    by_description
        .get(description)
        .map(|&index| &known[index])
        .ok_or_else(|| anyhow::anyhow!("no proposal with description '{description}'"))
}
