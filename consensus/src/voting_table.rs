//! Voting table — one per (height, round, vote type).
//!
//! Validates voter eligibility, rejects duplicate votes, tallies the rest and
//! fires the majority callback the first time the quorum predicate holds.
//!
//! The ledger update, the quorum check and the "already notified" flag sit
//! behind one mutex, so concurrent `add` calls that together cross the
//! threshold produce exactly one notification. The callback itself runs after
//! the lock is released and may query the table.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tally_types::{AddressedVote, BlockHash, VoteHash, VoteType};
use tracing::{debug, error};

use crate::config::QuorumMode;
use crate::error::VotingError;
use crate::quorum::{self, QuorumFn};
use crate::voters::VoterSet;
use crate::votes_set::VotesSet;

/// Notification invoked with the winning block hash when quorum is reached.
pub type QuorumReachedFn = Arc<dyn Fn(BlockHash) + Send + Sync>;

struct TableState {
    votes: VotesSet,
    quorum_reached: bool,
}

/// Vote accumulator for a single consensus step.
///
/// Never reset: the round layer builds a fresh table for the next step and
/// drops this one.
pub struct VotingTable {
    vote_type: VoteType,
    voters: Arc<dyn VoterSet>,
    quorum: QuorumFn,
    mode: QuorumMode,
    majority: QuorumReachedFn,
    state: Mutex<TableState>,
}

impl VotingTable {
    /// Create a table using the `2n/3 + 1` predicate over total votes.
    ///
    /// Fails with [`VotingError::InvalidConfiguration`] when `voters` is
    /// absent or empty.
    pub fn new<F>(
        vote_type: VoteType,
        voters: Option<Arc<dyn VoterSet>>,
        majority: F,
    ) -> Result<Self, VotingError>
    where
        F: Fn(BlockHash) + Send + Sync + 'static,
    {
        let voters = voters.ok_or_else(|| {
            VotingError::InvalidConfiguration("cannot create a voting table without voters".into())
        })?;
        if voters.is_empty() {
            return Err(VotingError::InvalidConfiguration(
                "cannot create a voting table with an empty voter set".into(),
            ));
        }

        Ok(Self {
            vote_type,
            voters,
            quorum: quorum::two_thirds_plus_one,
            mode: QuorumMode::Total,
            majority: Arc::new(majority),
            state: Mutex::new(TableState {
                votes: VotesSet::new(),
                quorum_reached: false,
            }),
        })
    }

    /// Replace the quorum predicate.
    pub fn with_quorum(mut self, quorum: QuorumFn) -> Self {
        self.quorum = quorum;
        self
    }

    /// Select which count drives the majority callback.
    pub fn with_mode(mut self, mode: QuorumMode) -> Self {
        self.mode = mode;
        self
    }

    /// Accept a vote from an eligible, not-yet-seen signer.
    ///
    /// On the first vote that satisfies the quorum predicate the majority
    /// callback runs, synchronously, with that vote's block hash. Later votes
    /// are still recorded but never notify again.
    pub fn add(&self, addressed: AddressedVote) -> Result<(), VotingError> {
        let address = *addressed.address();
        if !self.voters.contains(&address) {
            debug!(
                vote_type = %self.vote_type,
                voter = %address,
                "vote from address outside the voter set"
            );
            return Err(VotingError::NotEligibleVoter(address));
        }

        let vote = addressed.into_vote();
        let block_hash = vote.block_hash();

        let winner = {
            let mut state = self.lock();
            if state.votes.contains(&vote.hash()) {
                error!(
                    vote_type = %self.vote_type,
                    block_hash = %block_hash,
                    vote_hash = %vote.hash(),
                    vote = %vote,
                    "duplicate vote in voting table"
                );
                return Err(VotingError::DuplicateVote {
                    vote_type: self.vote_type,
                    block_hash,
                    vote_hash: vote.hash(),
                });
            }

            let candidate_votes = state.votes.add(vote);
            let observed = match self.mode {
                QuorumMode::Total => state.votes.len(),
                QuorumMode::PerCandidate => candidate_votes,
            };

            if !state.quorum_reached && (self.quorum)(observed, self.voters.len()) {
                state.quorum_reached = true;
                debug!(vote_type = %self.vote_type, votes = ?state.votes, "quorum votes");
                Some(block_hash)
            } else {
                None
            }
        };

        if let Some(winner) = winner {
            (self.majority)(winner);
        }
        Ok(())
    }

    /// Candidate with the most votes so far; a plurality, not necessarily a
    /// quorum. [`BlockHash::ZERO`] before any vote.
    pub fn leader(&self) -> BlockHash {
        self.lock().votes.leader()
    }

    pub fn len(&self) -> usize {
        self.lock().votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().votes.is_empty()
    }

    pub fn contains(&self, hash: &VoteHash) -> bool {
        self.lock().votes.contains(hash)
    }

    pub fn tally(&self, block_hash: &BlockHash) -> usize {
        self.lock().votes.tally(block_hash)
    }

    /// Whether the total accepted votes satisfy the quorum predicate.
    pub fn has_quorum(&self) -> bool {
        (self.quorum)(self.len(), self.voters.len())
    }

    /// Whether the votes for `block_hash` alone satisfy the quorum predicate.
    pub fn has_candidate_quorum(&self, block_hash: &BlockHash) -> bool {
        (self.quorum)(self.tally(block_hash), self.voters.len())
    }

    /// Whether the majority callback has been fired.
    pub fn quorum_reached(&self) -> bool {
        self.lock().quorum_reached
    }

    /// Vote count at which the default predicate holds for this voter set.
    pub fn threshold(&self) -> usize {
        quorum::threshold(self.voters.len())
    }

    pub fn eligible_voters(&self) -> usize {
        self.voters.len()
    }

    pub fn vote_type(&self) -> VoteType {
        self.vote_type
    }

    pub fn mode(&self) -> QuorumMode {
        self.mode
    }

    /// Copy of the accepted votes at this instant.
    pub fn snapshot(&self) -> VotesSet {
        self.lock().votes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for VotingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("VotingTable")
            .field("vote_type", &self.vote_type)
            .field("mode", &self.mode)
            .field("voters", &self.voters.len())
            .field("votes", &state.votes.len())
            .field("quorum_reached", &state.quorum_reached)
            .finish()
    }
}
