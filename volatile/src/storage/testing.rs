//! A conformance suite for [`Storage`] implementations.
//!
//! Implement [`StorageTestFixture`] for your backend and call
//! [`run_storage_adapter_tests`] from a test.

use std::time::Duration;

use volatile_core::{StorageKey, UnixTimestamp};

use crate::storage::Storage;

pub trait StorageTestFixture: Sized {
    type Storage: Storage;

    /// Produce a fixture wrapping a fresh, empty storage
    fn setup() -> impl Future<Output = Self>;
    fn storage(&self) -> &Self::Storage;
}

pub async fn run_storage_adapter_tests<F: StorageTestFixture>() {
    test_load_missing::<F>().await;
    test_put_then_load::<F>().await;
    test_put_overwrites::<F>().await;
    test_delete::<F>().await;
    test_delete_missing_is_ok::<F>().await;
    test_keys_are_independent::<F>().await;
    test_future_expiry_is_still_readable::<F>().await;
}

fn key(parts: &[&str]) -> StorageKey {
    StorageKey::from_parts(parts)
}

async fn test_load_missing<F: StorageTestFixture>() {
    let fixture = F::setup().await;
    let loaded = fixture
        .storage()
        .load(key(&["secrets", "missing", "record"]))
        .await
        .expect("load failed");
    assert_eq!(loaded, None, "a missing key should load as None");
}

async fn test_put_then_load<F: StorageTestFixture>() {
    let fixture = F::setup().await;
    let storage = fixture.storage();
    let k = key(&["secrets", "abc", "record"]);
    storage
        .put(k.clone(), vec![1, 2, 3], None)
        .await
        .expect("put failed");
    assert_eq!(storage.load(k).await.expect("load failed"), Some(vec![1, 2, 3]));
}

async fn test_put_overwrites<F: StorageTestFixture>() {
    let fixture = F::setup().await;
    let storage = fixture.storage();
    let k = key(&["rate-limit", "rl:00", "create:x"]);
    storage.put(k.clone(), vec![1], None).await.expect("put failed");
    storage.put(k.clone(), vec![2], None).await.expect("put failed");
    assert_eq!(storage.load(k).await.expect("load failed"), Some(vec![2]));
}

async fn test_delete<F: StorageTestFixture>() {
    let fixture = F::setup().await;
    let storage = fixture.storage();
    let k = key(&["secrets", "abc", "record"]);
    storage.put(k.clone(), vec![1], None).await.expect("put failed");
    storage.delete(k.clone()).await.expect("delete failed");
    assert_eq!(storage.load(k).await.expect("load failed"), None);
}

async fn test_delete_missing_is_ok<F: StorageTestFixture>() {
    let fixture = F::setup().await;
    fixture
        .storage()
        .delete(key(&["secrets", "never-written", "record"]))
        .await
        .expect("deleting a missing key should succeed");
}

async fn test_keys_are_independent<F: StorageTestFixture>() {
    let fixture = F::setup().await;
    let storage = fixture.storage();
    let a = key(&["secrets", "a", "record"]);
    let b = key(&["secrets", "b", "record"]);
    storage.put(a.clone(), vec![1], None).await.expect("put failed");
    storage.put(b.clone(), vec![2], None).await.expect("put failed");
    storage.delete(a.clone()).await.expect("delete failed");
    assert_eq!(storage.load(a).await.expect("load failed"), None);
    assert_eq!(storage.load(b).await.expect("load failed"), Some(vec![2]));
}

async fn test_future_expiry_is_still_readable<F: StorageTestFixture>() {
    let fixture = F::setup().await;
    let storage = fixture.storage();
    let k = key(&["rate-limit", "rl:01", "read:y"]);
    let expires_at = UnixTimestamp::now() + Duration::from_secs(3600);
    storage
        .put(k.clone(), vec![7], Some(expires_at))
        .await
        .expect("put failed");
    assert_eq!(storage.load(k).await.expect("load failed"), Some(vec![7]));
}
