//! Agora command line — scenario replay and proposal hashing.

mod scenario;

use std::path::PathBuf;

use clap::Parser;

use agora_governance::GovernorEngine;
use scenario::{decode_hex, parse_account, replay, Report, Scenario};

#[derive(Parser)]
#[command(name = "agora", about = "Agora governance engine tools", version)]
struct Cli {
    /// Log level fallback when RUST_LOG is unset:
    /// "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "AGORA_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a governance scenario file and report proposal outcomes.
    Replay {
        /// Path to the TOML scenario file.
        scenario: PathBuf,

        /// Emit the final report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Compute the content-addressed identifier of a proposal payload.
    Hash {
        /// Target account (repeatable, one per action).
        #[arg(long, required = true)]
        target: Vec<String>,

        /// Transferred value per action (defaults to 0 for each target).
        #[arg(long)]
        value: Vec<u128>,

        /// Hex-encoded call payload per action (defaults to empty).
        #[arg(long)]
        payload: Vec<String>,

        /// Human-readable proposal description.
        #[arg(long)]
        description: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    agora_utils::init_tracing_with(&cli.log_level);

    match cli.command {
        Command::Replay { scenario, json } => {
            let scenario = Scenario::load(&scenario)?;
            let report = replay(&scenario)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Command::Hash {
            target,
            value,
            payload,
            description,
        } => {
            let targets = target
                .iter()
                .map(|t| parse_account(t))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let values = if value.is_empty() {
                vec![0; targets.len()]
            } else {
                value
            };
            let payloads = if payload.is_empty() {
                vec![Vec::new(); targets.len()]
            } else {
                payload
                    .iter()
                    .map(|p| decode_hex(p))
                    .collect::<anyhow::Result<Vec<_>>>()?
            };
            let description_hash = agora_crypto::hash_description(&description);
            let id = GovernorEngine::proposal_id(targets, values, payloads, &description_hash)?;
            println!("description hash: {description_hash}");
            println!("proposal id:      {id}");
        }
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!("final time: {}s", report.final_time);
    for proposal in &report.proposals {
        println!("{}  \"{}\"", proposal.id, proposal.description);
        println!(
            "    state: {}  votes: {} for / {} against / {} abstain  quorum: {}",
            proposal.state, proposal.for_votes, proposal.against, proposal.abstain, proposal.quorum
        );
    }
}

