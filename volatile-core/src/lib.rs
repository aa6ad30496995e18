//! Sans-IO core of a single-read secret vault.
//!
//! Secrets are opaque ciphertext + nonce pairs. Each one is stored under a
//! freshly allocated [`SecretId`] in its own [`SecretActor`], can be read
//! exactly once, and disappears when its TTL runs out. Request quotas are
//! enforced by [`RateLimiterShard`] actors, selected by the [`ShardRouter`]
//! from a [`ClientFingerprint`].
//!
//! Nothing in this crate performs IO. Actors return [`io::IoTask`]s which a
//! host executes and reports back; see the `volatile` crate for a runtime and
//! `volatile-test-harness` for a deterministic host.

pub mod actors;
pub use actors::{
    ActorResult, AddressableActor, RequestId,
    rate_limiter::{
        CheckAndIncrement, RateCounterEntry, RateDecision, RateLimitError, RateLimiterShard,
    },
    secret::{ReadError, SecretActor, SecretReply, SecretRequest, StoreError},
};
mod allocator;
pub use allocator::{AllocationExhausted, AllocationStep, IdAllocator, MAX_ALLOCATION_ATTEMPTS};
mod fingerprint;
pub use fingerprint::{ClientFingerprint, UNKNOWN_ADDRESS, client_address};
pub mod io;
pub mod router;
pub use router::{BadShardCount, CounterKey, Route, Scope, ShardId, ShardRouter};
mod secret_id;
pub use secret_id::{BadSecretId, DEFAULT_ID_LEN, MAX_ID_LEN, MIN_ID_LEN, SecretId};
mod secret_record;
pub use secret_record::{
    BadPayload, MAX_CIPHERTEXT_CHARS, NONCE_LEN, Nonce, RecordDecodeError, SecretPayload,
    SecretRecord,
};
mod storage_key;
pub use storage_key::StorageKey;
mod ttl;
pub use ttl::TtlPolicy;
mod unix_timestamp;
pub use unix_timestamp::UnixTimestamp;
