use std::str::FromStr;

pub use alloy::primitives::Address;

use super::AddressError;

const ADDRESS_HEX_LEN: usize = 40;

/// Parses a 20-byte chain address from hex text.
///
/// The `0x` prefix is optional and letter case is ignored; EIP-55 checksums
/// are not enforced.
pub fn parse_address(value: &str) -> Result<Address, AddressError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != ADDRESS_HEX_LEN {
        return Err(AddressError::InvalidLength(digits.len()));
    }

    Address::from_str(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))
}
