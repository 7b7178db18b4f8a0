use tally_types::{BlockHash, ValidatorAddress, VoteHash, VoteType};
use thiserror::Error;

/// Failures surfaced by voting tables.
///
/// Every variant except `InvalidConfiguration` leaves the table untouched; the
/// caller decides whether to penalise the sender or ignore the vote.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VotingError {
    #[error("invalid voting table configuration: {0}")]
    InvalidConfiguration(String),

    #[error("voter address not found in voting table: {0}")]
    NotEligibleVoter(ValidatorAddress),

    #[error("duplicate {vote_type} vote {vote_hash} for block {block_hash}")]
    DuplicateVote {
        vote_type: VoteType,
        block_hash: BlockHash,
        vote_hash: VoteHash,
    },

    #[error(
        "vote for block {block} round {round} does not belong to block {expected_block} round {expected_round}"
    )]
    RoundMismatch {
        expected_block: u64,
        expected_round: u64,
        block: u64,
        round: u64,
    },
}
