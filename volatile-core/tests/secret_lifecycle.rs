use std::time::Duration;

use volatile_core::{
    NONCE_LEN, Nonce, ReadError, SecretId, SecretPayload, SecretRecord, StorageKey, StoreError,
};
use volatile_test_harness::Substrate;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn payload(bytes: &[u8]) -> SecretPayload {
    SecretPayload::new(bytes.to_vec(), Nonce::from([7; NONCE_LEN]))
}

fn id(s: &str) -> SecretId {
    s.parse().unwrap()
}

#[test]
fn read_returns_exactly_what_was_stored_once() {
    init_logging();
    let mut substrate = Substrate::new();
    let secret = id("roundTrip0000001");
    let expires_at = substrate.now() + Duration::from_secs(3600);

    substrate
        .store(&secret, SecretRecord::new(payload(b"ciphertext"), expires_at))
        .unwrap();

    assert_eq!(substrate.read(&secret), Ok(payload(b"ciphertext")));
    assert_eq!(substrate.read(&secret), Err(ReadError::NotFound));
    assert_eq!(substrate.read(&secret), Err(ReadError::NotFound));
    assert!(!substrate.storage().contains(
        &StorageKey::secret_record_path(&secret),
        substrate.now()
    ));
}

#[test]
fn burning_cancels_the_expiry_alarm() {
    init_logging();
    let mut substrate = Substrate::new();
    let secret = id("alarmCancel00001");
    let expires_at = substrate.now() + Duration::from_secs(600);

    substrate
        .store(&secret, SecretRecord::new(payload(b"x"), expires_at))
        .unwrap();
    assert_eq!(substrate.alarm_for(&secret), Some(expires_at));

    substrate.read(&secret).unwrap();
    assert_eq!(substrate.alarm_for(&secret), None);
}

#[test]
fn second_store_collides_while_occupied() {
    init_logging();
    let mut substrate = Substrate::new();
    let secret = id("collision0000001");
    let expires_at = substrate.now() + Duration::from_secs(600);

    substrate
        .store(&secret, SecretRecord::new(payload(b"first"), expires_at))
        .unwrap();
    assert_eq!(
        substrate.store(&secret, SecretRecord::new(payload(b"second"), expires_at)),
        Err(StoreError::Collision)
    );
    // the original record is untouched
    assert_eq!(substrate.read(&secret), Ok(payload(b"first")));
}

#[test]
fn an_emptied_identifier_accepts_a_new_store() {
    init_logging();
    let mut substrate = Substrate::new();
    let secret = id("reusedId00000001");
    let expires_at = substrate.now() + Duration::from_secs(600);

    substrate
        .store(&secret, SecretRecord::new(payload(b"first"), expires_at))
        .unwrap();
    substrate.read(&secret).unwrap();

    substrate
        .store(&secret, SecretRecord::new(payload(b"second"), expires_at))
        .unwrap();
    assert_eq!(substrate.read(&secret), Ok(payload(b"second")));
}

#[test]
fn expired_record_is_reported_and_removed_even_before_the_alarm() {
    init_logging();
    let mut substrate = Substrate::new();
    let secret = id("lazyExpiry000001");
    let key = StorageKey::secret_record_path(&secret);
    let expires_at = substrate.now() + Duration::from_secs(300);

    // A record placed directly in storage has no alarm scheduled, so only
    // the read path can notice that it expired
    substrate.storage_mut().insert(
        key.clone(),
        SecretRecord::new(payload(b"x"), expires_at).encode(),
    );
    substrate.advance(Duration::from_secs(301));

    assert_eq!(substrate.read(&secret), Err(ReadError::Expired));
    assert!(!substrate.storage().contains(&key, substrate.now()));
    assert_eq!(substrate.read(&secret), Err(ReadError::NotFound));
}

#[test]
fn reading_exactly_at_the_deadline_still_succeeds() {
    init_logging();
    let mut substrate = Substrate::new();
    let secret = id("deadline00000001");
    let expires_at = substrate.now() + Duration::from_secs(300);
    let record = SecretRecord::new(payload(b"x"), expires_at);

    substrate
        .storage_mut()
        .insert(StorageKey::secret_record_path(&secret), record.encode());
    substrate.advance(Duration::from_secs(300));
    assert_eq!(substrate.read(&secret), Ok(payload(b"x")));
}

#[test]
fn alarm_deletes_unread_secret() {
    init_logging();
    let mut substrate = Substrate::new();
    let secret = id("alarmExpiry00001");
    let expires_at = substrate.now() + Duration::from_secs(300);

    substrate
        .store(&secret, SecretRecord::new(payload(b"x"), expires_at))
        .unwrap();
    substrate.advance(Duration::from_secs(300));

    assert_eq!(substrate.alarm_for(&secret), None);
    assert!(!substrate.storage().contains(
        &StorageKey::secret_record_path(&secret),
        substrate.now()
    ));
    assert_eq!(substrate.read(&secret), Err(ReadError::NotFound));
}

#[test]
fn storage_failures_are_propagated() {
    init_logging();
    let mut substrate = Substrate::new();
    let secret = id("failingStore0001");
    let expires_at = substrate.now() + Duration::from_secs(300);

    substrate.storage_mut().set_failing(true);
    assert!(matches!(
        substrate.store(&secret, SecretRecord::new(payload(b"x"), expires_at)),
        Err(StoreError::Storage(_))
    ));
    assert!(matches!(substrate.read(&secret), Err(ReadError::Storage(_))));

    substrate.storage_mut().set_failing(false);
    assert_eq!(substrate.read(&secret), Err(ReadError::NotFound));
}

#[test]
fn unreadable_record_is_discarded() {
    init_logging();
    let mut substrate = Substrate::new();
    let secret = id("corruptRecord001");
    let key = StorageKey::secret_record_path(&secret);
    substrate.storage_mut().insert(key.clone(), vec![0xde, 0xad]);

    assert!(matches!(substrate.read(&secret), Err(ReadError::Storage(_))));
    assert!(!substrate.storage().contains(&key, substrate.now()));
}

#[test]
fn a_stale_alarm_on_an_empty_actor_does_nothing() {
    init_logging();
    let mut substrate = Substrate::new();
    let secret = id("staleAlarm000001");
    let key = StorageKey::secret_record_path(&secret);
    let expires_at = substrate.now() + Duration::from_secs(600);

    substrate
        .store(&secret, SecretRecord::new(payload(b"first"), expires_at))
        .unwrap();
    substrate.read(&secret).unwrap();

    // the wake-up for the burned record arrives anyway
    substrate.fire_alarm(&secret);
    assert!(!substrate.storage().contains(&key, substrate.now()));
    assert_eq!(substrate.alarm_for(&secret), None);

    // and for an identifier which never held anything
    let never_used = id("neverUsed0000001");
    substrate.fire_alarm(&never_used);
    assert_eq!(substrate.read(&never_used), Err(ReadError::NotFound));

    // the identifier is still usable afterwards
    let later = substrate.now() + Duration::from_secs(600);
    substrate
        .store(&secret, SecretRecord::new(payload(b"second"), later))
        .unwrap();
    assert_eq!(substrate.alarm_for(&secret), Some(later));
    assert_eq!(substrate.read(&secret), Ok(payload(b"second")));
}
