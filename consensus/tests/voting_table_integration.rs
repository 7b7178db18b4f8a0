//! Integration tests for voting tables under the properties the round layer
//! depends on: exact thresholds, deduplication, and at-most-once majority
//! notification with concurrent callers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use tally_consensus::{
    threshold, QuorumMode, RoundVotingTables, VoterSet, Voters, VotingConfig, VotingError,
    VotingTable,
};
use tally_types::{AddressedVote, BlockHash, ValidatorAddress, Vote, VoteType};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn addr(index: usize) -> ValidatorAddress {
    let mut bytes = [0u8; 20];
    bytes[..8].copy_from_slice(&(index as u64 + 1).to_be_bytes());
    ValidatorAddress::new(bytes)
}

fn hash(byte: u8) -> BlockHash {
    BlockHash::new([byte; 32])
}

fn registry(n: usize) -> Option<Arc<dyn VoterSet>> {
    Some(Arc::new(Voters::new((0..n).map(addr))))
}

fn prevote(voter: usize, block: BlockHash) -> AddressedVote {
    AddressedVote::new(
        addr(voter),
        Vote::new(addr(voter), 42, 1, VoteType::Prevote, block),
    )
}

fn counting_table(n: usize) -> (Arc<VotingTable>, Arc<AtomicUsize>, Arc<Mutex<Vec<BlockHash>>>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let winners = Arc::new(Mutex::new(Vec::new()));
    let (f, w) = (fired.clone(), winners.clone());
    let table = VotingTable::new(VoteType::Prevote, registry(n), move |winner| {
        f.fetch_add(1, Ordering::SeqCst);
        w.lock().unwrap().push(winner);
    })
    .expect("non-empty registry");
    (Arc::new(table), fired, winners)
}

// ---------------------------------------------------------------------------
// Sequential properties
// ---------------------------------------------------------------------------

#[test]
fn threshold_is_exact_for_small_validator_sets() {
    for n in 1..=20 {
        let (table, fired, _) = counting_table(n);
        let needed = threshold(n);
        for voter in 0..n {
            table.add(prevote(voter, hash(1))).unwrap();
            let expected = usize::from(voter + 1 >= needed);
            assert_eq!(
                fired.load(Ordering::SeqCst),
                expected,
                "n={n}, votes={}",
                voter + 1
            );
        }
    }
}

#[test]
fn duplicate_after_quorum_is_still_rejected() {
    let (table, fired, _) = counting_table(4);
    for voter in 0..3 {
        table.add(prevote(voter, hash(1))).unwrap();
    }
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    let err = table.add(prevote(0, hash(1))).unwrap_err();
    assert!(matches!(err, VotingError::DuplicateVote { .. }));
    assert_eq!(table.len(), 3);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn same_signer_different_block_is_not_a_duplicate() {
    // Equivocation is detected upstream; the table deduplicates on content only.
    let (table, _, _) = counting_table(7);
    table.add(prevote(0, hash(1))).unwrap();
    table.add(prevote(0, hash(2))).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.tally(&hash(1)), 1);
    assert_eq!(table.tally(&hash(2)), 1);
}

#[test]
fn decoded_copies_with_forged_trailing_hash_are_duplicates() {
    let (table, fired, _) = counting_table(4);
    let vote = Vote::new(addr(0), 42, 1, VoteType::Prevote, hash(7));
    let encoded = bincode::serialize(&vote).unwrap();

    for i in 0..3u8 {
        let mut wire = encoded.clone();
        let mut forged = *vote.hash().as_bytes();
        forged[31] ^= i + 1;
        wire.extend_from_slice(&forged);

        let decoded: Vote = bincode::deserialize(&wire).unwrap();
        assert_eq!(decoded.hash(), vote.hash());

        let result = table.add(AddressedVote::new(addr(0), decoded));
        if i == 0 {
            result.expect("first copy accepted");
        } else {
            assert!(matches!(result, Err(VotingError::DuplicateVote { .. })));
        }
    }

    assert_eq!(table.len(), 1);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn rejected_votes_never_count_towards_quorum() {
    let (table, fired, _) = counting_table(4);
    table.add(prevote(0, hash(1))).unwrap();
    table.add(prevote(1, hash(1))).unwrap();
    for outsider in 100..110 {
        assert!(matches!(
            table.add(prevote(outsider, hash(1))),
            Err(VotingError::NotEligibleVoter(_))
        ));
    }
    assert!(table.add(prevote(1, hash(1))).is_err());
    assert_eq!(table.len(), 2);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_adds_notify_exactly_once() {
    const VOTERS: usize = 31;

    for _ in 0..50 {
        let (table, fired, winners) = counting_table(VOTERS);
        let barrier = Arc::new(Barrier::new(VOTERS));

        let handles: Vec<_> = (0..VOTERS)
            .map(|voter| {
                let table = table.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    table.add(prevote(voter, hash((voter % 3) as u8 + 1)))
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("voter thread").expect("eligible vote");
        }

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(table.len(), VOTERS);
        assert_eq!(winners.lock().unwrap().len(), 1);
        assert!(table.quorum_reached());
    }
}

#[test]
fn concurrent_duplicates_are_accepted_once() {
    const COPIES: usize = 16;
    let (table, fired, _) = counting_table(4);
    let barrier = Arc::new(Barrier::new(COPIES));

    let results: Vec<_> = (0..COPIES)
        .map(|_| {
            let table = table.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                table.add(prevote(0, hash(9)))
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(VotingError::DuplicateVote { .. })))
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(duplicates, COPIES - 1);
    assert_eq!(table.len(), 1);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn concurrent_rounds_notify_once_per_vote_type() {
    const VOTERS: usize = 10;
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = fired.clone();
    let tables = Arc::new(
        RoundVotingTables::new(
            42,
            1,
            registry(VOTERS),
            &VotingConfig {
                quorum_mode: QuorumMode::PerCandidate,
            },
            move |kind, winner| sink.lock().unwrap().push((kind, winner)),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..VOTERS)
        .flat_map(|voter| {
            VoteType::ALL.into_iter().map(move |kind| (voter, kind))
        })
        .map(|(voter, kind)| {
            let tables = tables.clone();
            thread::spawn(move || {
                tables.add(AddressedVote::new(
                    addr(voter),
                    Vote::new(addr(voter), 42, 1, kind, hash(7)),
                ))
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread").expect("eligible vote");
    }

    let mut fired = fired.lock().unwrap().clone();
    fired.sort();
    assert_eq!(
        fired,
        vec![(VoteType::Prevote, hash(7)), (VoteType::Precommit, hash(7))]
    );
}
