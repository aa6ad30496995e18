pub use volatile_core::{StorageKey, io::StorageError};
use volatile_core::UnixTimestamp;

mod in_memory;
pub use in_memory::InMemoryStorage;
pub mod testing;

/// The key-value store actors persist their state into.
///
/// Each actor only touches keys beneath its own prefix, so one store can be
/// shared by every actor in the vault. `expires_at` on [`put`](Storage::put)
/// is a hint: a backend may drop the entry any time after that instant, or
/// keep it around. Actors never depend on it for correctness.
pub trait Storage: Send + Sync + Clone + 'static {
    fn load(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;
    fn put(
        &self,
        key: StorageKey,
        data: Vec<u8>,
        expires_at: Option<UnixTimestamp>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
    fn delete(&self, key: StorageKey) -> impl Future<Output = Result<(), StorageError>> + Send;
}
