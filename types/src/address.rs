//! Validator address type.

use crate::error::{decode_fixed, TypesError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 20-byte validator address, rendered as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValidatorAddress([u8; 20]);

impl ValidatorAddress {
    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for ValidatorAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<20>(s).map(Self)
    }
}

impl From<[u8; 20]> for ValidatorAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}
