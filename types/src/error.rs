//! Parse errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("unknown vote type: {0}")]
    UnknownVoteType(String),
}

/// Decode an optionally `0x`-prefixed hex string into exactly `N` bytes.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], TypesError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| TypesError::InvalidLength {
            expected: N,
            got: bytes.len(),
        })
}
