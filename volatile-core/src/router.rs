//! Routing of rate limit checks to shards.
//!
//! Every client is pinned to one shard by the first byte of its fingerprint
//! so that all of its requests are serialized through the same actor and
//! counted against the same key, while unrelated clients spread across
//! independent shards.

use std::fmt;

use crate::ClientFingerprint;

/// Default number of rate limiter shards
pub const DEFAULT_SHARD_COUNT: u16 = 256;

/// What a rate limit is being checked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Create,
    Read,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Create => "create",
            Scope::Read => "read",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The index of a rate limiter shard, which is also its actor name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShardId(u8);

impl From<u8> for ShardId {
    fn from(id: u8) -> Self {
        ShardId(id)
    }
}

impl From<ShardId> for u8 {
    fn from(id: ShardId) -> Self {
        id.0
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rl:{}", hex::encode([self.0]))
    }
}

/// Key of a single counter within a shard: `<scope>:<fingerprint token>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterKey(String);

impl CounterKey {
    pub fn new(scope: Scope, fingerprint: &ClientFingerprint) -> Self {
        CounterKey(format!("{}:{}", scope, fingerprint.token()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CounterKey {
    fn from(key: String) -> Self {
        CounterKey(key)
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a check for a given client and scope must be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub shard: ShardId,
    pub counter_key: CounterKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("shard count must be between 1 and 256, got {0}")]
pub struct BadShardCount(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardRouter {
    shard_count: u16,
}

impl Default for ShardRouter {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}

impl ShardRouter {
    pub fn new(shard_count: u16) -> Result<Self, BadShardCount> {
        if shard_count == 0 || shard_count > 256 {
            return Err(BadShardCount(shard_count));
        }
        Ok(Self { shard_count })
    }

    pub fn shard_count(&self) -> u16 {
        self.shard_count
    }

    pub fn route(&self, scope: Scope, fingerprint: &ClientFingerprint) -> Route {
        // shard_count <= 256 so the remainder always fits a u8
        let shard = (u16::from(fingerprint.first_byte()) % self.shard_count) as u8;
        Route {
            shard: ShardId(shard),
            counter_key: CounterKey::new(scope, fingerprint),
        }
    }
}
