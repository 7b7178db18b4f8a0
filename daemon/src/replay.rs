//! Concurrent vote replay.
//!
//! Every vote of a scenario is submitted from its own task, the way votes
//! arrive from independent peer connections, and the outcome of each `add`
//! is counted.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tally_consensus::{RoundVotingTables, VoterSet, VotingConfig, VotingError};
use tally_types::{BlockHash, VoteType};
use tokio::task::JoinSet;

use crate::error::DaemonError;
use crate::scenario::Scenario;

/// Outcome counters for a replay. Safe to update from many tasks.
#[derive(Debug, Default)]
pub struct ReplayStats {
    accepted: AtomicU64,
    not_eligible: AtomicU64,
    duplicate: AtomicU64,
    round_mismatch: AtomicU64,
}

impl ReplayStats {
    pub fn record(&self, result: &Result<(), VotingError>) {
        let counter = match result {
            Ok(()) => &self.accepted,
            Err(VotingError::NotEligibleVoter(_)) => &self.not_eligible,
            Err(VotingError::DuplicateVote { .. }) => &self.duplicate,
            Err(VotingError::RoundMismatch { .. }) => &self.round_mismatch,
            // Only raised when a table is built, never by `add`.
            Err(VotingError::InvalidConfiguration(_)) => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn not_eligible(&self) -> u64 {
        self.not_eligible.load(Ordering::Relaxed)
    }

    pub fn duplicate(&self) -> u64 {
        self.duplicate.load(Ordering::Relaxed)
    }

    pub fn round_mismatch(&self) -> u64 {
        self.round_mismatch.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> u64 {
        self.not_eligible() + self.duplicate() + self.round_mismatch()
    }
}

/// Per vote type summary after the replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSummary {
    pub votes: usize,
    pub leader: BlockHash,
    pub majority: Option<BlockHash>,
}

#[derive(Debug)]
pub struct ReplayReport {
    pub stats: Arc<ReplayStats>,
    pub threshold: usize,
    pub tables: BTreeMap<VoteType, TableSummary>,
}

pub async fn replay(scenario: Scenario, config: &VotingConfig) -> Result<ReplayReport, DaemonError> {
    let majorities: Arc<Mutex<BTreeMap<VoteType, BlockHash>>> = Arc::default();
    let sink = majorities.clone();
    let threshold = tally_consensus::threshold(scenario.voters.len());
    let voters: Arc<dyn VoterSet> = Arc::new(scenario.voters);

    let tables = RoundVotingTables::new(
        scenario.block_number,
        scenario.round,
        Some(voters),
        config,
        move |vote_type, winner| {
            tracing::info!(%vote_type, %winner, "majority reached");
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(vote_type, winner);
        },
    )
    .map_err(|e| DaemonError::Scenario(e.to_string()))?;
    let tables = Arc::new(tables);
    let stats = Arc::new(ReplayStats::default());

    let mut tasks = JoinSet::new();
    for vote in scenario.votes {
        let tables = tables.clone();
        let stats = stats.clone();
        tasks.spawn(async move {
            let result = tables.add(vote);
            if let Err(e) = &result {
                tracing::warn!("vote rejected: {e}");
            }
            stats.record(&result);
        });
    }
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::warn!("replay task failed: {e}");
        }
    }

    let majorities = majorities
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    let summaries = VoteType::ALL
        .into_iter()
        .map(|vote_type| {
            let table = tables.table(vote_type);
            let summary = TableSummary {
                votes: table.len(),
                leader: table.leader(),
                majority: majorities.get(&vote_type).copied(),
            };
            (vote_type, summary)
        })
        .collect();

    Ok(ReplayReport {
        stats,
        threshold,
        tables: summaries,
    })
}
