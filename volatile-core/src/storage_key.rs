use std::fmt;

use crate::{SecretId, router::ShardId};

/// A hierarchical key for storage operations in the vault.
///
/// Each actor only ever touches keys underneath its own prefix, which is how
/// a single shared key-value store stands in for "storage local to the
/// actor": a secret actor owns `secrets/<id>/...` and a rate limiter shard
/// owns `rate-limit/<shard>/...`.
///
/// ## Examples
///
/// ```rust
/// use volatile_core::StorageKey;
///
/// let key = StorageKey::from(vec!["secrets", "abc", "record"]);
/// let prefix = StorageKey::from(vec!["secrets", "abc"]);
/// assert!(prefix.is_prefix_of(&key));
/// assert_eq!(key.to_string(), "secrets/abc/record");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(Vec<String>);

impl StorageKey {
    /// Where the (at most one) record of a secret actor lives
    pub fn secret_record_path(secret_id: &SecretId) -> StorageKey {
        StorageKey(vec![
            "secrets".to_string(),
            secret_id.to_string(),
            "record".to_string(),
        ])
    }

    /// Where a rate limiter shard keeps the counter for `counter_key`
    pub fn rate_counter_path(shard: ShardId, counter_key: &str) -> StorageKey {
        StorageKey(vec![
            "rate-limit".to_string(),
            shard.to_string(),
            counter_key.to_string(),
        ])
    }

    /// Creates a storage key from a slice of string parts.
    pub fn from_parts(parts: &[&str]) -> Self {
        StorageKey(parts.iter().map(|s| s.to_string()).collect())
    }

    /// Checks if this key is a prefix of another key.
    pub fn is_prefix_of(&self, other: &StorageKey) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a == b)
    }
}

impl<'a> From<Vec<&'a str>> for StorageKey {
    fn from(vec: Vec<&'a str>) -> Self {
        StorageKey(vec.into_iter().map(String::from).collect())
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_and_counter_paths_do_not_overlap() {
        let id: SecretId = "abcdefgh12345678".parse().unwrap();
        let secret = StorageKey::secret_record_path(&id);
        let counter = StorageKey::rate_counter_path(ShardId::from(7), "create:xyz");

        assert_eq!(secret.to_string(), "secrets/abcdefgh12345678/record");
        assert_eq!(counter.to_string(), "rate-limit/rl:07/create:xyz");
        assert!(!StorageKey::from_parts(&["secrets"]).is_prefix_of(&counter));
    }
}
