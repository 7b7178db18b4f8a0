//! Content hash of a vote.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte vote content hash, derived from the signer and the vote payload.
///
/// Two votes with the same `VoteHash` are the same vote; the ledger uses it as
/// its deduplication key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteHash([u8; 32]);

impl VoteHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for VoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoteHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for VoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
