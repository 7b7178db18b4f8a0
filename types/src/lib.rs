//! Fundamental types for the tally voting core.
//!
//! This crate defines the types shared by every other crate in the workspace:
//! validator addresses, block and vote hashes, vote types, and the vote itself.

pub mod address;
pub mod block;
pub mod error;
pub mod hash;
pub mod vote;

pub use address::ValidatorAddress;
pub use block::BlockHash;
pub use error::TypesError;
pub use hash::VoteHash;
pub use vote::{AddressedVote, Vote, VoteType};
