//! Vote scenarios — a validator set plus the votes to replay against it.
//!
//! ```toml
//! block_number = 42
//! round = 0
//! validators = ["0x01…", "0x02…"]
//!
//! [[votes]]
//! address = "0x01…"
//! vote_type = "prevote"
//! block_hash = "0xaa…"
//! ```
//!
//! `signer`, `block_number` and `round` are optional per vote and default to
//! the claimed address and the scenario's height/round.

use serde::Deserialize;
use std::path::Path;

use tally_consensus::Voters;
use tally_types::{AddressedVote, BlockHash, ValidatorAddress, Vote, VoteType};

use crate::error::DaemonError;

#[derive(Debug, Deserialize)]
struct RawScenario {
    block_number: u64,
    #[serde(default)]
    round: u64,
    validators: Vec<String>,
    #[serde(default)]
    votes: Vec<RawVote>,
}

#[derive(Debug, Deserialize)]
struct RawVote {
    address: String,
    signer: Option<String>,
    vote_type: VoteType,
    block_hash: String,
    block_number: Option<u64>,
    round: Option<u64>,
}

/// A parsed scenario, ready to replay.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub block_number: u64,
    pub round: u64,
    pub voters: Voters,
    pub votes: Vec<AddressedVote>,
}

impl Scenario {
    pub fn from_toml_file(path: &Path) -> Result<Self, DaemonError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DaemonError::Scenario(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, DaemonError> {
        let raw: RawScenario =
            toml::from_str(s).map_err(|e| DaemonError::Scenario(e.to_string()))?;

        let voters = raw
            .validators
            .iter()
            .map(|v| parse_address(v))
            .collect::<Result<Voters, _>>()?;

        let votes = raw
            .votes
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let address = parse_address(&v.address)?;
                let signer = match v.signer {
                    Some(s) => parse_address(&s)?,
                    None => address,
                };
                let block_hash: BlockHash = v
                    .block_hash
                    .parse()
                    .map_err(|e| DaemonError::Scenario(format!("vote {i}: block_hash: {e}")))?;
                let vote = Vote::new(
                    signer,
                    v.block_number.unwrap_or(raw.block_number),
                    v.round.unwrap_or(raw.round),
                    v.vote_type,
                    block_hash,
                );
                Ok(AddressedVote::new(address, vote))
            })
            .collect::<Result<Vec<_>, DaemonError>>()?;

        Ok(Self {
            block_number: raw.block_number,
            round: raw.round,
            voters,
            votes,
        })
    }
}

fn parse_address(s: &str) -> Result<ValidatorAddress, DaemonError> {
    s.parse()
        .map_err(|e| DaemonError::Scenario(format!("address {s:?}: {e}")))
}
