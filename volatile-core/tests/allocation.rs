use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};
use volatile_core::{
    DEFAULT_ID_LEN, MAX_ALLOCATION_ATTEMPTS, NONCE_LEN, Nonce, SecretId, SecretPayload,
    SecretRecord, StorageKey, TtlPolicy,
};
use volatile_test_harness::{CreateError, Substrate};

const SEED: u64 = 42;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn payload() -> SecretPayload {
    SecretPayload::new(b"opaque".to_vec(), Nonce::from([1; NONCE_LEN]))
}

/// The identifiers a substrate seeded with `SEED` will try, in order
fn upcoming_ids(n: usize) -> Vec<SecretId> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..n)
        .map(|_| SecretId::new_with_rng(&mut rng, DEFAULT_ID_LEN))
        .collect()
}

fn occupy(substrate: &mut Substrate, id: &SecretId) {
    let record = SecretRecord::new(payload(), substrate.now() + Duration::from_secs(3600));
    substrate
        .storage_mut()
        .insert(StorageKey::secret_record_path(id), record.encode());
}

#[test]
fn create_then_read_round_trips() {
    init_logging();
    let mut substrate = Substrate::new_with_seed(SEED);
    let ttl = TtlPolicy::default().clamp(Some(Duration::from_secs(1)));

    let (id, expires_at) = substrate.create(payload(), ttl).unwrap();
    assert_eq!(id, upcoming_ids(1)[0]);
    assert_eq!(expires_at, substrate.now() + Duration::from_secs(300));
    assert_eq!(substrate.read(&id), Ok(payload()));
}

#[test]
fn collisions_are_retried_with_a_fresh_id() {
    init_logging();
    let mut substrate = Substrate::new_with_seed(SEED);
    let ids = upcoming_ids(3);
    occupy(&mut substrate, &ids[0]);
    occupy(&mut substrate, &ids[1]);

    let (id, _) = substrate
        .create(payload(), Duration::from_secs(600))
        .unwrap();
    assert_eq!(id, ids[2]);

    // the occupants were left alone
    assert_eq!(substrate.read(&ids[0]), Ok(payload()));
}

#[test]
fn allocation_gives_up_after_the_retry_bound() {
    init_logging();
    let mut substrate = Substrate::new_with_seed(SEED);
    for id in upcoming_ids(MAX_ALLOCATION_ATTEMPTS) {
        occupy(&mut substrate, &id);
    }

    match substrate.create(payload(), Duration::from_secs(600)) {
        Err(CreateError::Exhausted(e)) => assert_eq!(e.attempts, MAX_ALLOCATION_ATTEMPTS),
        other => panic!("expected exhaustion, got {other:?}"),
    }
}

#[test]
fn storage_errors_are_not_retried() {
    init_logging();
    let mut substrate = Substrate::new_with_seed(SEED);
    substrate.storage_mut().set_failing(true);

    assert!(matches!(
        substrate.create(payload(), Duration::from_secs(600)),
        Err(CreateError::Storage(_))
    ));

    // only the first candidate was consumed, so the next create gets the second
    substrate.storage_mut().set_failing(false);
    let (id, _) = substrate
        .create(payload(), Duration::from_secs(600))
        .unwrap();
    assert_eq!(id, upcoming_ids(2)[1]);
}

#[test]
fn ttl_is_clamped_before_storing() {
    init_logging();
    let mut substrate = Substrate::new_with_seed(SEED);
    let policy = TtlPolicy::default();
    let ttl = policy.clamp(Some(Duration::from_secs(999 * 24 * 60 * 60)));

    let (id, expires_at) = substrate.create(payload(), ttl).unwrap();
    assert_eq!(expires_at, substrate.now() + policy.max);

    substrate.advance(policy.max);
    assert_eq!(substrate.read(&id), Err(volatile_core::ReadError::NotFound));
}
