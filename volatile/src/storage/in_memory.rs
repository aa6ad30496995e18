use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use volatile_core::{StorageKey, UnixTimestamp, io::StorageError};

use crate::{
    runtime::{Clock, SystemClock},
    storage::Storage,
};

#[derive(Clone)]
struct Entry {
    data: Vec<u8>,
    expires_at: Option<UnixTimestamp>,
}

impl Entry {
    /// Entries are still readable at the instant they expire
    fn is_live(&self, now: UnixTimestamp) -> bool {
        self.expires_at.is_none_or(|at| at >= now)
    }
}

/// A [`Storage`] which keeps everything in a shared map.
///
/// Entries past their `expires_at` are dropped the next time they are looked
/// at. Expiry is judged by the storage's [`Clock`], which must be the clock
/// the vault computes deadlines from; [`VaultBuilder::new`](crate::VaultBuilder::new)
/// wires this up for the default storage.
#[derive(Clone)]
pub struct InMemoryStorage {
    entries: Arc<Mutex<HashMap<StorageKey, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStorage {
    /// A storage which expires entries by the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock<C: Clock>(clock: C) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock: Arc::new(clock),
        }
    }

    pub fn contains(&self, key: &StorageKey) -> bool {
        self.live(key).is_some()
    }

    /// Number of live entries underneath `prefix`
    pub fn count_under(&self, prefix: &StorageKey) -> usize {
        let now = self.clock.now();
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, e)| prefix.is_prefix_of(k) && e.is_live(now))
            .count()
    }

    fn live(&self, key: &StorageKey) -> Option<Vec<u8>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.data.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for InMemoryStorage {
    fn load(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send {
        futures::future::ready(Ok(self.live(&key)))
    }

    fn put(
        &self,
        key: StorageKey,
        data: Vec<u8>,
        expires_at: Option<UnixTimestamp>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        self.entries
            .lock()
            .unwrap()
            .insert(key, Entry { data, expires_at });
        futures::future::ready(Ok(()))
    }

    fn delete(&self, key: StorageKey) -> impl Future<Output = Result<(), StorageError>> + Send {
        self.entries.lock().unwrap().remove(&key);
        futures::future::ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::atomic::AtomicU64, sync::atomic::Ordering, time::Duration};

    use super::*;

    #[derive(Clone, Default)]
    struct ManualClock(Arc<AtomicU64>);

    impl Clock for ManualClock {
        fn now(&self) -> UnixTimestamp {
            UnixTimestamp::from(self.0.load(Ordering::SeqCst))
        }
    }

    #[test]
    fn expiry_follows_the_configured_clock() {
        let clock = ManualClock::default();
        clock.0.store(1_000, Ordering::SeqCst);
        let storage = InMemoryStorage::with_clock(clock.clone());
        let key = StorageKey::from_parts(&["rate-limit", "rl:00", "create:x"]);

        // far behind the wall clock, so a wall-clock check would drop it at once
        let expires_at = UnixTimestamp::from(1_000u64) + Duration::from_secs(10);
        futures::executor::block_on(storage.put(key.clone(), vec![1], Some(expires_at))).unwrap();
        assert!(storage.contains(&key));

        clock.0.store(11_000, Ordering::SeqCst);
        assert!(storage.contains(&key), "live at exactly expires_at");

        clock.0.store(11_001, Ordering::SeqCst);
        assert!(!storage.contains(&key));
        assert_eq!(
            storage.count_under(&StorageKey::from_parts(&["rate-limit"])),
            0
        );
    }
}
