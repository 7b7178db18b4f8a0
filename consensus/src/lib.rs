//! Round voting tables for a BFT consensus engine.
//!
//! A table ingests authenticated votes for one (height, round, vote type),
//! rejects votes from outside the validator set and duplicates, tallies
//! support per candidate block, and notifies once when `⌊2n/3⌋ + 1` of the
//! `n` eligible validators have voted.
//!
//! ## Module overview
//!
//! - [`voters`] — Eligibility oracle for the round's validator set.
//! - [`votes_set`] — Deduplicating vote ledger with per-block tallies and leader.
//! - [`quorum`] — The 2/3+1 quorum predicate.
//! - [`voting_table`] — Eligibility, dedup, tally and one-shot majority notification.
//! - [`round_tables`] — Prevote and precommit tables for one round.
//! - [`config`] — Quorum counting mode.
//! - [`error`] — Voting error types.

pub mod config;
pub mod error;
pub mod quorum;
pub mod round_tables;
pub mod voters;
pub mod votes_set;
pub mod voting_table;

pub use config::{QuorumMode, VotingConfig};
pub use error::VotingError;
pub use quorum::{threshold, two_thirds_plus_one, QuorumFn};
pub use round_tables::RoundVotingTables;
pub use voters::{VoterSet, Voters};
pub use votes_set::VotesSet;
pub use voting_table::{QuorumReachedFn, VotingTable};
