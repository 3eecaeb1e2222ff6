//! Governance parameters — voting windows, quorum fraction, timelock delays.

use serde::{Deserialize, Serialize};

/// Configuration of the governance engine.
///
/// All durations are whole seconds; quorum is the fraction
/// `quorum_numerator / quorum_denominator` of the total token supply
/// snapshotted at a proposal's voting-window start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorParams {
    /// Seconds between proposal creation and the start of voting.
    pub voting_delay_secs: u64,

    /// Seconds the voting window stays open.
    pub voting_period_secs: u64,

    /// Quorum fraction numerator.
    pub quorum_numerator: u32,

    /// Quorum fraction denominator.
    pub quorum_denominator: u32,

    /// Mandatory delay between the voting deadline and execution.
    pub timelock_min_delay_secs: u64,

    /// Window after the execution time in which a passed proposal may
    /// still be executed before it expires.
    pub execution_grace_period_secs: u64,
}

impl GovernorParams {
    /// Production defaults: 1-day delay, 7-day voting window, 40% quorum,
    /// 2-day timelock, 14-day execution grace period.
    pub fn mainnet_defaults() -> Self {
        Self {
            voting_delay_secs: 24 * 3600,
            voting_period_secs: 7 * 24 * 3600,
            quorum_numerator: 40,
            quorum_denominator: 100,
            timelock_min_delay_secs: 2 * 24 * 3600,
            execution_grace_period_secs: 14 * 24 * 3600,
        }
    }

    /// Short windows for tests and scenario replay.
    pub fn dev_defaults() -> Self {
        Self {
            voting_delay_secs: 60,
            voting_period_secs: 600,
            quorum_numerator: 40,
            quorum_denominator: 100,
            timelock_min_delay_secs: 10,
            execution_grace_period_secs: 3600,
        }
    }
}

/// Default is the production configuration.
impl Default for GovernorParams {
    fn default() -> Self {
        Self::mainnet_defaults()
    }
}
