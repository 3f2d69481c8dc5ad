//! Processor signing key.
//!
//! The processor authorizes destination-chain transactions with a secp256k1
//! key supplied as hex. Parsing is strict: exactly 32 bytes that form a valid
//! scalar. The key never appears in `Debug` output.
use std::fmt;

use alloy::signers::local::PrivateKeySigner;
use k256::ecdsa::SigningKey;
use zeroize::Zeroizing;

use super::{Address, KeyError};

const PRIVATE_KEY_LEN: usize = 32;

#[derive(Clone)]
pub struct ProcessorKey {
    signer: PrivateKeySigner,
}

impl ProcessorKey {
    /// Address derived from the public half of the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Local signer for the relay engine to sign with.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Lowercase hex of the 32 key bytes, without prefix.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.signer.credential().to_bytes()))
    }
}

impl fmt::Debug for ProcessorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Parses a secp256k1 private key from hex text with an optional `0x` prefix.
pub fn parse_private_key(value: &str) -> Result<ProcessorKey, KeyError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(KeyError::Empty);
    }

    let bytes = Zeroizing::new(
        hex::decode(digits).map_err(|e| KeyError::InvalidHex(e.to_string()))?,
    );
    if bytes.len() != PRIVATE_KEY_LEN {
        return Err(KeyError::InvalidLength(bytes.len()));
    }

    let signing_key = SigningKey::from_slice(&bytes).map_err(|_| KeyError::InvalidScalar)?;

    Ok(ProcessorKey {
        signer: PrivateKeySigner::from_signing_key(signing_key),
    })
}
