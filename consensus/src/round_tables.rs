//! Per-round voting tables — one prevote and one precommit table for a
//! (block number, round) pair, sharing the round's voter set.

use std::sync::Arc;

use tally_types::{AddressedVote, BlockHash, VoteType};

use crate::config::VotingConfig;
use crate::error::VotingError;
use crate::voters::VoterSet;
use crate::voting_table::VotingTable;

/// Routes incoming votes to the table for their vote type.
///
/// `on_majority` receives the vote type alongside the winning hash, and is
/// called at most once per vote type.
#[derive(Debug)]
pub struct RoundVotingTables {
    block_number: u64,
    round: u64,
    prevotes: VotingTable,
    precommits: VotingTable,
}

impl RoundVotingTables {
    pub fn new<F>(
        block_number: u64,
        round: u64,
        voters: Option<Arc<dyn VoterSet>>,
        config: &VotingConfig,
        on_majority: F,
    ) -> Result<Self, VotingError>
    where
        F: Fn(VoteType, BlockHash) + Send + Sync + 'static,
    {
        let on_majority = Arc::new(on_majority);
        let table = |vote_type: VoteType| {
            let notify = on_majority.clone();
            VotingTable::new(vote_type, voters.clone(), move |winner| {
                (*notify)(vote_type, winner)
            })
            .map(|table| table.with_mode(config.quorum_mode))
        };

        Ok(Self {
            block_number,
            round,
            prevotes: table(VoteType::Prevote)?,
            precommits: table(VoteType::Precommit)?,
        })
    }

    /// Add a vote to the table matching its type.
    ///
    /// Votes for another block number or round are rejected with
    /// [`VotingError::RoundMismatch`] before eligibility is checked.
    pub fn add(&self, addressed: AddressedVote) -> Result<(), VotingError> {
        let vote = addressed.vote();
        if vote.block_number() != self.block_number || vote.round() != self.round {
            return Err(VotingError::RoundMismatch {
                expected_block: self.block_number,
                expected_round: self.round,
                block: vote.block_number(),
                round: vote.round(),
            });
        }
        let vote_type = vote.vote_type();
        self.table(vote_type).add(addressed)
    }

    pub fn table(&self, vote_type: VoteType) -> &VotingTable {
        match vote_type {
            VoteType::Prevote => &self.prevotes,
            VoteType::Precommit => &self.precommits,
        }
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn round(&self) -> u64 {
        self.round
    }
}
