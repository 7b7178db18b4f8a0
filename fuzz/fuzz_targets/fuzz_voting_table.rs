#![no_main]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tally_consensus::{threshold, QuorumMode, VoterSet, Voters, VotingError, VotingTable};
use tally_types::{AddressedVote, BlockHash, ValidatorAddress, Vote, VoteType};

#[derive(Debug, Arbitrary)]
struct Input {
    voters: u8,
    per_candidate: bool,
    votes: Vec<(u8, u8, u8)>,
}

// Feed an arbitrary vote sequence into a table and check the counting
// invariants after every call.
fuzz_target!(|input: Input| {
    let n = input.voters % 32 + 1;
    let registry: Option<Arc<dyn VoterSet>> = Some(Arc::new(Voters::new(
        (0..n).map(|i| ValidatorAddress::new([i; 20])),
    )));
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let mode = if input.per_candidate {
        QuorumMode::PerCandidate
    } else {
        QuorumMode::Total
    };
    let table = VotingTable::new(VoteType::Prevote, registry, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .expect("non-empty registry")
    .with_mode(mode);

    for (claimed, signer, block) in input.votes {
        let before = table.len();
        let vote = Vote::new(
            ValidatorAddress::new([signer % 40; 20]),
            1,
            0,
            VoteType::Prevote,
            BlockHash::new([block % 4; 32]),
        );
        match table.add(AddressedVote::new(ValidatorAddress::new([claimed % 40; 20]), vote)) {
            Ok(()) => assert_eq!(table.len(), before + 1),
            Err(VotingError::NotEligibleVoter(_)) | Err(VotingError::DuplicateVote { .. }) => {
                assert_eq!(table.len(), before)
            }
            Err(other) => panic!("unexpected error: {other}"),
        }

        let tally: usize = (0..4u8).map(|b| table.tally(&BlockHash::new([b; 32]))).sum();
        assert_eq!(tally, table.len());
        assert!(fired.load(Ordering::SeqCst) <= 1);
        if mode == QuorumMode::Total {
            let expected = usize::from(table.len() >= threshold(n as usize));
            assert_eq!(fired.load(Ordering::SeqCst), expected);
        }
    }
});
