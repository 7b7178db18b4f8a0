//! Vote ledger — accepted votes for one (round, vote type) pair.
//!
//! Deduplicates on the vote content hash, keeps a per-candidate tally, and
//! tracks the leading candidate incrementally.

use std::collections::HashMap;
use tally_types::{BlockHash, Vote, VoteHash};

/// Append-only, deduplicating set of votes with per-block tallies.
///
/// Invariants:
/// - each `VoteHash` is stored at most once;
/// - the tallies sum to `len()`;
/// - `leader()` has the maximum tally. On a tie the candidate that reached
///   that tally first keeps the lead; [`BlockHash::ZERO`] when empty.
#[derive(Clone, Debug, Default)]
pub struct VotesSet {
    votes: HashMap<VoteHash, Vote>,
    tally: HashMap<BlockHash, usize>,
    leader: BlockHash,
    leader_votes: usize,
}

impl VotesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote and return its candidate's new tally.
    ///
    /// Callers check [`contains`](Self::contains) first; a vote whose hash is
    /// already present is not counted again and the current tally is returned.
    pub fn add(&mut self, vote: Vote) -> usize {
        let block_hash = vote.block_hash();
        if self.votes.contains_key(&vote.hash()) {
            return self.tally(&block_hash);
        }
        self.votes.insert(vote.hash(), vote);

        let count = self.tally.entry(block_hash).or_insert(0);
        *count += 1;
        let count = *count;

        // Strictly greater: a candidate merely matching the leader does not
        // take over.
        if count > self.leader_votes {
            self.leader = block_hash;
            self.leader_votes = count;
        }
        count
    }

    pub fn contains(&self, hash: &VoteHash) -> bool {
        self.votes.contains_key(hash)
    }

    pub fn get(&self, hash: &VoteHash) -> Option<&Vote> {
        self.votes.get(hash)
    }

    /// Total accepted votes across all candidates.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Current leading candidate, or [`BlockHash::ZERO`] if no votes.
    pub fn leader(&self) -> BlockHash {
        self.leader
    }

    /// Tally of the leading candidate.
    pub fn leader_votes(&self) -> usize {
        self.leader_votes
    }

    /// Number of accepted votes for `block_hash`.
    pub fn tally(&self, block_hash: &BlockHash) -> usize {
        self.tally.get(block_hash).copied().unwrap_or(0)
    }

    /// Number of distinct candidates with at least one vote.
    pub fn candidates(&self) -> usize {
        self.tally.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vote> {
        self.votes.values()
    }
}
