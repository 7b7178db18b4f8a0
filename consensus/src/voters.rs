//! Voter registry — who may vote in the current round.
//!
//! The validator-set derivation lives outside this crate. Tables only need a
//! membership oracle, so they consume it through [`VoterSet`]. [`Voters`] is
//! the in-memory snapshot used by the node and by tests.

use std::collections::HashSet;
use tally_types::ValidatorAddress;

/// Eligibility oracle for one round.
///
/// Implementations must be immutable for the lifetime of the tables that hold
/// them: `len()` is the `n` in the `2n/3 + 1` threshold.
pub trait VoterSet: Send + Sync {
    fn contains(&self, address: &ValidatorAddress) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable snapshot of the eligible validator addresses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Voters {
    addresses: HashSet<ValidatorAddress>,
}

impl Voters {
    pub fn new(addresses: impl IntoIterator<Item = ValidatorAddress>) -> Self {
        Self {
            addresses: addresses.into_iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidatorAddress> {
        self.addresses.iter()
    }
}

impl VoterSet for Voters {
    fn contains(&self, address: &ValidatorAddress) -> bool {
        self.addresses.contains(address)
    }

    fn len(&self) -> usize {
        self.addresses.len()
    }
}

impl FromIterator<ValidatorAddress> for Voters {
    fn from_iter<I: IntoIterator<Item = ValidatorAddress>>(iter: I) -> Self {
        Self::new(iter)
    }
}
