use crate::{StorageKey, UnixTimestamp};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageTask {
    Load {
        key: StorageKey,
    },
    /// Write `value` under `key`. When `expires_at` is set the backend may
    /// drop the entry once that time has passed; this is a best-effort
    /// cleanup hint, actors never rely on it for correctness.
    Put {
        key: StorageKey,
        value: Vec<u8>,
        expires_at: Option<UnixTimestamp>,
    },
    Delete {
        key: StorageKey,
    },
}
