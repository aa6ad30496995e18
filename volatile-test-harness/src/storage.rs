use std::collections::HashMap;

use volatile_core::{
    StorageKey, UnixTimestamp,
    io::{StorageError, StorageResult, StorageTask},
};

/// In-memory key-value storage with best-effort expiry, as seen by actors
/// hosted in a [`Substrate`](crate::Substrate).
#[derive(Debug, Clone, Default)]
pub struct Storage {
    entries: HashMap<StorageKey, Entry>,
    failing: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<UnixTimestamp>,
}

impl Entry {
    /// Entries are still readable at the instant they expire
    fn is_live(&self, now: UnixTimestamp) -> bool {
        self.expires_at.is_none_or(|at| at >= now)
    }
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is there a live value under `key` at `now`?
    pub fn contains(&self, key: &StorageKey, now: UnixTimestamp) -> bool {
        self.get(key, now).is_some()
    }

    pub fn get(&self, key: &StorageKey, now: UnixTimestamp) -> Option<&[u8]> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.as_slice())
    }

    /// Number of live entries under `prefix`
    pub fn count_under(&self, prefix: &StorageKey, now: UnixTimestamp) -> usize {
        self.entries
            .keys()
            .filter(|key| prefix.is_prefix_of(key) && self.contains(key, now))
            .count()
    }

    pub fn insert(&mut self, key: StorageKey, value: Vec<u8>) {
        self.entries.insert(
            key,
            Entry {
                value,
                expires_at: None,
            },
        );
    }

    /// Drop every entry which is no longer live at `now`
    pub(crate) fn evict_expired(&mut self, now: UnixTimestamp) {
        self.entries.retain(|_, entry| entry.is_live(now));
    }

    /// Make every subsequent storage task fail until switched back
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub(crate) fn execute(
        &mut self,
        task: StorageTask,
        now: UnixTimestamp,
    ) -> Result<StorageResult, StorageError> {
        if self.failing {
            return Err(StorageError::new("storage unavailable"));
        }
        match task {
            StorageTask::Load { key } => {
                let value = self.get(&key, now).map(<[u8]>::to_vec);
                if value.is_none() {
                    self.entries.remove(&key);
                }
                Ok(StorageResult::Load { value })
            }
            StorageTask::Put {
                key,
                value,
                expires_at,
            } => {
                self.entries.insert(key, Entry { value, expires_at });
                Ok(StorageResult::Put)
            }
            StorageTask::Delete { key } => {
                self.entries.remove(&key);
                Ok(StorageResult::Delete)
            }
        }
    }
}
