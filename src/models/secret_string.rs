//! SecretString - A container for sensitive string data
//!
//! Holds credentials such as database and queue passwords. The content is
//! zeroized on drop and never shows up in `Debug` output.
use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

#[derive(Clone, Default)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
    /// Creates a new SecretString by copying the given text.
    pub fn new(s: &str) -> Self {
        Self(Zeroizing::new(s.to_string()))
    }

    /// Runs `f` with a borrowed view of the secret.
    pub fn as_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        f(self.0.as_str())
    }

    /// Returns a zeroizing copy of the secret.
    ///
    /// Only use this when the secret has to be handed to a client library.
    pub fn to_str(&self) -> Zeroizing<String> {
        Zeroizing::new(self.0.as_str().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(Zeroizing::new(value))
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        let lhs = self.0.as_bytes();
        let rhs = other.0.as_bytes();
        lhs.len() == rhs.len() && lhs.ct_eq(rhs).into()
    }
}

impl Eq for SecretString {}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SecretString(REDACTED)")
    }
}
