//! Votes cast by validators for a height/round step.
//!
//! A [`Vote`] arrives already authenticated and decoded; this crate only
//! carries it. Its content hash is fixed at construction from the signer and
//! the payload, so it is the identity the voting ledger deduplicates on.

use crate::address::ValidatorAddress;
use crate::block::BlockHash;
use crate::error::TypesError;
use crate::hash::VoteHash;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

type Blake2b256 = Blake2b<U32>;

/// The consensus step a vote belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Prevote,
    Precommit,
}

impl VoteType {
    pub const ALL: [VoteType; 2] = [VoteType::Prevote, VoteType::Precommit];

    fn tag(self) -> u8 {
        match self {
            VoteType::Prevote => 0,
            VoteType::Precommit => 1,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteType::Prevote => f.write_str("prevote"),
            VoteType::Precommit => f.write_str("precommit"),
        }
    }
}

impl FromStr for VoteType {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prevote" => Ok(VoteType::Prevote),
            "precommit" => Ok(VoteType::Precommit),
            other => Err(TypesError::UnknownVoteType(other.to_string())),
        }
    }
}

/// A signed statement by a validator for one height/round/step.
///
/// Immutable once built. `hash` is the BLAKE2b-256 digest of the signer and
/// the payload fields. The hash is not part of the serialized form; decoding
/// always recomputes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VotePayload", into = "VotePayload")]
pub struct Vote {
    signer: ValidatorAddress,
    block_number: u64,
    round: u64,
    vote_type: VoteType,
    block_hash: BlockHash,
    hash: VoteHash,
}

impl Vote {
    pub fn new(
        signer: ValidatorAddress,
        block_number: u64,
        round: u64,
        vote_type: VoteType,
        block_hash: BlockHash,
    ) -> Self {
        let hash = content_hash(&signer, block_number, round, vote_type, &block_hash);
        Self {
            signer,
            block_number,
            round,
            vote_type,
            block_hash,
            hash,
        }
    }

    /// The address embedded in the vote payload.
    pub fn signer(&self) -> &ValidatorAddress {
        &self.signer
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn vote_type(&self) -> VoteType {
        self.vote_type
    }

    /// The candidate block this vote endorses.
    pub fn block_hash(&self) -> BlockHash {
        self.block_hash
    }

    /// Content hash identifying this vote.
    pub fn hash(&self) -> VoteHash {
        self.hash
    }
}

/// Serialized form of a [`Vote`]: everything except the content hash.
#[derive(Serialize, Deserialize)]
struct VotePayload {
    signer: ValidatorAddress,
    block_number: u64,
    round: u64,
    vote_type: VoteType,
    block_hash: BlockHash,
}

impl From<VotePayload> for Vote {
    fn from(p: VotePayload) -> Self {
        Vote::new(p.signer, p.block_number, p.round, p.vote_type, p.block_hash)
    }
}

impl From<Vote> for VotePayload {
    fn from(v: Vote) -> Self {
        Self {
            signer: v.signer,
            block_number: v.block_number,
            round: v.round,
            vote_type: v.vote_type,
            block_hash: v.block_hash,
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vote{{signer: {}, number: {}, round: {}, type: {}, block: {}, hash: {}}}",
            self.signer, self.block_number, self.round, self.vote_type, self.block_hash, self.hash
        )
    }
}

fn content_hash(
    signer: &ValidatorAddress,
    block_number: u64,
    round: u64,
    vote_type: VoteType,
    block_hash: &BlockHash,
) -> VoteHash {
    let mut hasher = Blake2b256::new();
    hasher.update(signer.as_bytes());
    hasher.update(block_number.to_le_bytes());
    hasher.update(round.to_le_bytes());
    hasher.update([vote_type.tag()]);
    hasher.update(block_hash.as_bytes());
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    VoteHash::new(output)
}

/// A vote paired with the address that claims to have signed it.
///
/// `address` is what eligibility is checked against; it is distinct from the
/// signer embedded in the vote payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressedVote {
    address: ValidatorAddress,
    vote: Vote,
}

impl AddressedVote {
    pub fn new(address: ValidatorAddress, vote: Vote) -> Self {
        Self { address, vote }
    }

    pub fn address(&self) -> &ValidatorAddress {
        &self.address
    }

    pub fn vote(&self) -> &Vote {
        &self.vote
    }

    pub fn into_vote(self) -> Vote {
        self.vote
    }
}
