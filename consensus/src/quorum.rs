//! Byzantine quorum predicate.
//!
//! With `n` eligible voters the protocol tolerates `⌊(n-1)/3⌋` faulty ones and
//! needs strictly more than two thirds of `n` to agree: `⌊2n/3⌋ + 1` votes.

/// Quorum predicate: `(votes observed, eligible voters) -> reached`.
///
/// Tables take it as a plain function so tests can substitute other
/// thresholds.
pub type QuorumFn = fn(votes: usize, voters: usize) -> bool;

/// Minimum number of votes for a quorum among `voters` eligible voters.
pub fn threshold(voters: usize) -> usize {
    voters * 2 / 3 + 1
}

/// The default predicate: `votes >= ⌊2 * voters / 3⌋ + 1`.
pub fn two_thirds_plus_one(votes: usize, voters: usize) -> bool {
    votes >= threshold(voters)
}
