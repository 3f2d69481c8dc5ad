//! Property-based tests for address and key parsing.
//!
//!   Refer to `src/models/address.rs` and `src/models/signing_key.rs`.
use proptest::{prelude::*, test_runner::Config};
use relayer_processor::models::{parse_address, parse_private_key, AddressError, KeyError};

proptest! {
  #![proptest_config(Config {
    cases: 500, ..Config::default()
  })]

  /// Hex in, address out, hex back reproduces the input ignoring case.
  #[test]
  fn prop_address_round_trips_case_insensitively(
    digits in "[0-9a-fA-F]{40}",
    prefixed in any::<bool>()
  ) {
      let input = if prefixed { format!("0x{}", digits) } else { digits.clone() };
      let address = parse_address(&input).unwrap();
      prop_assert_eq!(format!("{:x}", address), digits.to_lowercase());
  }

  /// Any digit count other than 40 is rejected with that count.
  #[test]
  fn prop_address_wrong_length_fails(digits in "[0-9a-f]{0,80}") {
      prop_assume!(digits.len() != 40);
      let result = parse_address(&format!("0x{}", digits));
      prop_assert_eq!(result, Err(AddressError::InvalidLength(digits.len())));
  }

  /// Non-hex characters are rejected even at the right length.
  #[test]
  fn prop_address_non_hex_fails(
    prefix in "[0-9a-f]{0,39}",
    bad in "[g-zG-Z]",
  ) {
      let digits = format!("{}{}{}", prefix, bad, "0".repeat(39 - prefix.len()));
      prop_assert!(parse_address(&digits).is_err());
  }

  /// Whole-byte keys of the wrong size report their byte count.
  #[test]
  fn prop_key_wrong_byte_count_fails(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
      prop_assume!(bytes.len() != 32);
      let result = parse_private_key(&hex::encode(&bytes));
      prop_assert!(matches!(result, Err(KeyError::InvalidLength(n)) if n == bytes.len()));
  }

  /// Odd-length hex never yields a key.
  #[test]
  fn prop_key_odd_length_fails(digits in "[0-9a-f]{1,63}") {
      prop_assume!(digits.len() % 2 == 1);
      prop_assert!(matches!(parse_private_key(&digits), Err(KeyError::InvalidHex(_))));
  }
}
