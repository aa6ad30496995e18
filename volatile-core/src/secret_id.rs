use std::{fmt, str::FromStr};

use rand::{CryptoRng, Rng};

/// Alphabet identifiers are drawn from
pub const ID_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of identifiers generated by the allocator
pub const DEFAULT_ID_LEN: usize = 16;

/// Shortest identifier accepted on the read path
pub const MIN_ID_LEN: usize = 8;

/// Longest identifier accepted on the read path
pub const MAX_ID_LEN: usize = 64;

/// The identifier of a secret, and the name of the actor which owns it.
///
/// Knowing an identifier is what allows a single read attempt. It is not
/// itself secret (the decryption key travels out of band) but with 62^16
/// possible values it is infeasible to guess.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecretId(String);

impl SecretId {
    /// Generate a random identifier of `len` characters.
    ///
    /// The rng must be cryptographically secure; identifiers are the only
    /// capability needed to burn a secret.
    pub fn new_with_rng<R: Rng + CryptoRng>(rng: &mut R, len: usize) -> Self {
        let id = (0..len)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();
        SecretId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretId({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid secret id")]
pub struct BadSecretId;

impl FromStr for SecretId {
    type Err = BadSecretId;

    /// Accepts any ASCII alphanumeric string of 8 to 64 characters
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !(MIN_ID_LEN..=MAX_ID_LEN).contains(&s.len()) {
            return Err(BadSecretId);
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(BadSecretId);
        }
        Ok(SecretId(s.to_string()))
    }
}
