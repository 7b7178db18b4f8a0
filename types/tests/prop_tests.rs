use proptest::prelude::*;

use tally_types::{BlockHash, ValidatorAddress, Vote, VoteType};

fn vote_type() -> impl Strategy<Value = VoteType> {
    prop_oneof![Just(VoteType::Prevote), Just(VoteType::Precommit)]
}

proptest! {
    /// BlockHash Display output parses back to the same hash.
    #[test]
    fn block_hash_display_parse(bytes in prop::array::uniform32(0u8..)) {
        let hash = BlockHash::new(bytes);
        let parsed: BlockHash = hash.to_string().parse().unwrap();
        prop_assert_eq!(parsed, hash);
    }

    /// BlockHash::is_zero is true only for all-zero bytes.
    #[test]
    fn block_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = BlockHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// ValidatorAddress Display output parses back to the same address.
    #[test]
    fn address_display_parse(bytes in prop::array::uniform20(0u8..)) {
        let addr = ValidatorAddress::new(bytes);
        let parsed: ValidatorAddress = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// The content hash is a pure function of signer and payload.
    #[test]
    fn vote_hash_deterministic(
        signer in prop::array::uniform20(0u8..),
        number in any::<u64>(),
        round in any::<u64>(),
        kind in vote_type(),
        block in prop::array::uniform32(0u8..),
    ) {
        let a = Vote::new(ValidatorAddress::new(signer), number, round, kind, BlockHash::new(block));
        let b = Vote::new(ValidatorAddress::new(signer), number, round, kind, BlockHash::new(block));
        prop_assert_eq!(a.hash(), b.hash());
    }

    /// Votes for different blocks from the same signer never collide.
    #[test]
    fn vote_hash_distinguishes_blocks(
        signer in prop::array::uniform20(0u8..),
        a in prop::array::uniform32(0u8..),
        b in prop::array::uniform32(0u8..),
    ) {
        prop_assume!(a != b);
        let signer = ValidatorAddress::new(signer);
        let va = Vote::new(signer, 1, 0, VoteType::Prevote, BlockHash::new(a));
        let vb = Vote::new(signer, 1, 0, VoteType::Prevote, BlockHash::new(b));
        prop_assert_ne!(va.hash(), vb.hash());
    }

    /// A vote keeps its content hash across bincode transport.
    #[test]
    fn vote_survives_bincode(
        signer in prop::array::uniform20(0u8..),
        round in any::<u64>(),
        kind in vote_type(),
        block in prop::array::uniform32(0u8..),
    ) {
        let vote = Vote::new(ValidatorAddress::new(signer), 5, round, kind, BlockHash::new(block));
        let encoded = bincode::serialize(&vote).unwrap();
        let decoded: Vote = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded.hash(), vote.hash());
        prop_assert_eq!(decoded, vote);
    }
}
