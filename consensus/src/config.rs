//! Voting table configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which count the quorum predicate is evaluated against after each vote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumMode {
    /// Total accepted votes across every candidate. Votes split between
    /// candidates still count towards the threshold.
    #[default]
    Total,
    /// Accepted votes for the candidate of the vote just added.
    PerCandidate,
}

impl fmt::Display for QuorumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuorumMode::Total => f.write_str("total"),
            QuorumMode::PerCandidate => f.write_str("per_candidate"),
        }
    }
}

impl FromStr for QuorumMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "total" => Ok(QuorumMode::Total),
            "per_candidate" => Ok(QuorumMode::PerCandidate),
            other => Err(format!("unknown quorum mode: {other}")),
        }
    }
}

/// Settings shared by every voting table of a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingConfig {
    #[serde(default)]
    pub quorum_mode: QuorumMode,
}
