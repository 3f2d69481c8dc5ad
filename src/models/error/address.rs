use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("expected 40 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("malformed hex: {0}")]
    InvalidHex(String),
}
