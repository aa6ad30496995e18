use std::time::Duration;

use volatile_core::{
    BadShardCount, DEFAULT_ID_LEN, MAX_CIPHERTEXT_CHARS, MAX_ID_LEN, MIN_ID_LEN, Scope,
    ShardRouter, TtlPolicy, router::DEFAULT_SHARD_COUNT,
};

/// Tunables for a [`Vault`](crate::Vault).
///
/// Every field has a default, so a partial config deserializes cleanly:
///
/// ```rust
/// use volatile::VaultConfig;
///
/// let config: VaultConfig = serde_json::from_str(r#"{ "id_len": 24 }"#).unwrap();
/// assert_eq!(config.id_len, 24);
/// assert!(config.rate_limit.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub ttl: TtlPolicy,
    /// `None` turns rate limiting off entirely
    pub rate_limit: Option<RateLimitConfig>,
    /// Longest base64url ciphertext accepted from clients
    pub max_ciphertext_chars: usize,
    /// Length of newly allocated secret identifiers
    pub id_len: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            ttl: TtlPolicy::default(),
            rate_limit: Some(RateLimitConfig::default()),
            max_ciphertext_chars: MAX_CIPHERTEXT_CHARS,
            id_len: DEFAULT_ID_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub create_limit: u32,
    pub read_limit: u32,
    pub shard_count: u16,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60 * 60),
            create_limit: 100,
            read_limit: 1000,
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}

impl RateLimitConfig {
    pub fn limit_for(&self, scope: Scope) -> u32 {
        match scope {
            Scope::Create => self.create_limit,
            Scope::Read => self.read_limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    BadShardCount(#[from] BadShardCount),
    #[error("secret ids must be between 8 and 64 characters, got {0}")]
    BadIdLength(usize),
    #[error("ttl bounds must satisfy min <= default <= max")]
    BadTtl,
    #[error("rate limits and the rate window must be positive")]
    BadRateLimit,
}

impl VaultConfig {
    /// Check the config and build the router it describes
    pub(crate) fn validate(&self) -> Result<ShardRouter, ConfigError> {
        if !(MIN_ID_LEN..=MAX_ID_LEN).contains(&self.id_len) {
            return Err(ConfigError::BadIdLength(self.id_len));
        }
        let TtlPolicy { min, default, max } = self.ttl;
        if !(min <= default && default <= max) {
            return Err(ConfigError::BadTtl);
        }
        let Some(rate_limit) = &self.rate_limit else {
            return Ok(ShardRouter::default());
        };
        if rate_limit.create_limit == 0 || rate_limit.read_limit == 0 || rate_limit.window.is_zero()
        {
            return Err(ConfigError::BadRateLimit);
        }
        Ok(ShardRouter::new(rate_limit.shard_count)?)
    }
}
