use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::UnixTimestamp;

/// Length in bytes of the nonce the client-side cipher requires
pub const NONCE_LEN: usize = 12;

/// Default ceiling on the base64url length of an incoming ciphertext (~1MB)
pub const MAX_CIPHERTEXT_CHARS: usize = 1_400_000;

/// A 12 byte nonce, stored and returned alongside the ciphertext.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

impl From<[u8; NONCE_LEN]> for Nonce {
    fn from(bytes: [u8; NONCE_LEN]) -> Self {
        Nonce(bytes)
    }
}

impl TryFrom<&[u8]> for Nonce {
    type Error = BadPayload;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; NONCE_LEN] = bytes
            .try_into()
            .map_err(|_| BadPayload::InvalidNonceLength)?;
        Ok(Nonce(bytes))
    }
}

impl std::fmt::Debug for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Nonce(..)")
    }
}

/// Why an incoming ciphertext/nonce pair was refused before reaching an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BadPayload {
    #[error("missing encrypted data or nonce")]
    MissingFields,
    #[error("encrypted data and nonce must be base64url")]
    InvalidEncoding,
    #[error("nonce must be 12 bytes")]
    InvalidNonceLength,
    #[error("encrypted data is too large")]
    TooLarge,
}

/// The opaque material a secret consists of: ciphertext plus nonce.
///
/// The vault never sees plaintext, so the only things it can check are the
/// encoding and the fixed nonce length.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretPayload {
    pub ciphertext: Vec<u8>,
    pub nonce: Nonce,
}

impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretPayload")
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}

impl SecretPayload {
    pub fn new(ciphertext: Vec<u8>, nonce: Nonce) -> Self {
        Self { ciphertext, nonce }
    }

    /// Parse the base64url strings a client submits.
    ///
    /// `max_ciphertext_chars` bounds the encoded ciphertext length.
    pub fn from_base64url(
        ciphertext: &str,
        nonce: &str,
        max_ciphertext_chars: usize,
    ) -> Result<Self, BadPayload> {
        if ciphertext.is_empty() || nonce.is_empty() {
            return Err(BadPayload::MissingFields);
        }
        if !is_base64url(ciphertext) || !is_base64url(nonce) {
            return Err(BadPayload::InvalidEncoding);
        }
        // 12 bytes encode to 16 characters
        if !(16..=24).contains(&nonce.len()) {
            return Err(BadPayload::InvalidNonceLength);
        }
        if ciphertext.len() > max_ciphertext_chars {
            return Err(BadPayload::TooLarge);
        }
        let ciphertext = URL_SAFE_NO_PAD
            .decode(ciphertext)
            .map_err(|_| BadPayload::InvalidEncoding)?;
        let nonce = URL_SAFE_NO_PAD
            .decode(nonce)
            .map_err(|_| BadPayload::InvalidEncoding)?;
        Ok(Self {
            ciphertext,
            nonce: Nonce::try_from(nonce.as_slice())?,
        })
    }

    /// The `(ciphertext, nonce)` pair in the encoding clients submitted it in
    pub fn to_base64url(&self) -> (String, String) {
        (
            URL_SAFE_NO_PAD.encode(&self.ciphertext),
            URL_SAFE_NO_PAD.encode(self.nonce.as_bytes()),
        )
    }
}

fn is_base64url(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// What a secret actor persists: the payload and the instant it stops being
/// readable.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SecretRecord {
    pub payload: SecretPayload,
    pub expires_at: UnixTimestamp,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordDecodeError {
    #[error("invalid cbor: {0}")]
    Cbor(#[from] minicbor::decode::Error),
    #[error("unexpected record layout")]
    Layout,
    #[error(transparent)]
    Nonce(#[from] BadPayload),
}

impl SecretRecord {
    pub fn new(payload: SecretPayload, expires_at: UnixTimestamp) -> Self {
        Self {
            payload,
            expires_at,
        }
    }

    /// Has this record outlived its TTL? Reads exactly at `expires_at` still succeed.
    pub fn is_expired(&self, now: UnixTimestamp) -> bool {
        now > self.expires_at
    }

    /// Encodes as a three element CBOR array: `[ciphertext, nonce, expires_at_millis]`
    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = minicbor::Encoder::new(Vec::new());
        // Writing into a Vec cannot fail
        let _ = encoder
            .array(3)
            .and_then(|e| e.bytes(&self.payload.ciphertext))
            .and_then(|e| e.bytes(self.payload.nonce.as_bytes()))
            .and_then(|e| e.u64(u64::from(self.expires_at)));
        encoder.into_writer()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RecordDecodeError> {
        let mut decoder = minicbor::Decoder::new(bytes);
        if decoder.array()? != Some(3) {
            return Err(RecordDecodeError::Layout);
        }
        let ciphertext = decoder.bytes()?.to_vec();
        let nonce = Nonce::try_from(decoder.bytes()?)?;
        let expires_at = UnixTimestamp::from(decoder.u64()?);
        Ok(Self {
            payload: SecretPayload { ciphertext, nonce },
            expires_at,
        })
    }
}
