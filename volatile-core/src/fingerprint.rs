use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

/// Headers consulted, in order, for the caller's network address
const ADDRESS_HEADERS: [&str; 2] = ["CF-Connecting-IP", "X-Real-IP"];

/// Placeholder fingerprinted when a caller's address cannot be determined
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// Pick the caller's address out of request headers.
///
/// `header` looks up a header value by name. Proxy supplied headers are
/// preferred; for `X-Forwarded-For` only the first hop counts.
pub fn client_address<'a, F>(header: F) -> Option<&'a str>
where
    F: Fn(&str) -> Option<&'a str>,
{
    for name in ADDRESS_HEADERS {
        if let Some(value) = header(name).filter(|v| !v.is_empty()) {
            return Some(value);
        }
    }
    header("X-Forwarded-For")
        .and_then(|fwd| fwd.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// A one-way digest of a client's network address.
///
/// Only the digest is ever stored or logged, the address itself is dropped
/// as soon as the fingerprint is computed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientFingerprint([u8; 32]);

impl ClientFingerprint {
    pub fn from_address(address: &str) -> Self {
        ClientFingerprint(Sha256::digest(address.as_bytes()).into())
    }

    pub fn first_byte(&self) -> u8 {
        self.0[0]
    }

    /// Fixed width (43 character) base64url rendering of the digest
    pub fn token(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }
}

impl From<[u8; 32]> for ClientFingerprint {
    fn from(digest: [u8; 32]) -> Self {
        ClientFingerprint(digest)
    }
}

impl std::fmt::Display for ClientFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl std::fmt::Debug for ClientFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClientFingerprint({})", self.token())
    }
}
