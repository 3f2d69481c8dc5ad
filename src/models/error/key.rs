use thiserror::Error;

/// Reasons a private key can be rejected.
///
/// Messages never include key material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("private key is empty")]
    Empty,
    #[error("malformed hex: {0}")]
    InvalidHex(String),
    #[error("expected 32 bytes, got {0}")]
    InvalidLength(usize),
    #[error("not a valid secp256k1 scalar")]
    InvalidScalar,
}
