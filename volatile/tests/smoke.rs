#![cfg(feature = "tokio")]

use std::time::Duration;

use volatile::{
    CreateSecretError, ReadSecretError, Scope, Stopped, Vault, VaultConfig,
    runtime::tokio::TokioRuntime,
    storage::{InMemoryStorage, Storage, StorageKey},
};
use volatile_core::{Nonce, SecretPayload, SecretRecord};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn payload(byte: u8) -> SecretPayload {
    SecretPayload::new(vec![byte; 32], Nonce::from([byte; 12]))
}

#[tokio::test(start_paused = true)]
async fn create_then_read_once() -> eyre::Result<()> {
    init_logging();
    let vault = Vault::build_tokio().load()?;

    let created = vault.create_secret(payload(1), None).await?;
    assert_eq!(created.id.as_str().len(), 16);
    assert_eq!(
        created.expires_at,
        vault.now() + Duration::from_secs(24 * 60 * 60)
    );

    let read = vault.read_secret(created.id.as_str()).await?;
    assert_eq!(read, payload(1));
    assert_eq!(
        vault.read_secret(created.id.as_str()).await,
        Err(ReadSecretError::NotFound)
    );
    Ok(())
}

#[tokio::test]
async fn base64url_payloads_round_trip() -> eyre::Result<()> {
    init_logging();
    let vault = Vault::build_tokio().load()?;

    let created = vault
        .create_secret_from_base64url("aGVsbG8", "AAECAwQFBgcICQoL", Some(Duration::from_secs(600)))
        .await?;
    let read = vault.read_secret(created.id.as_str()).await?;
    assert_eq!(
        read.to_base64url(),
        ("aGVsbG8".to_string(), "AAECAwQFBgcICQoL".to_string())
    );

    let too_short_nonce = vault
        .create_secret_from_base64url("aGVsbG8", "AAEC", None)
        .await;
    assert!(matches!(
        too_short_nonce,
        Err(CreateSecretError::BadPayload(_))
    ));
    Ok(())
}

#[tokio::test]
async fn malformed_ids_are_refused_before_reaching_an_actor() -> eyre::Result<()> {
    init_logging();
    let vault = Vault::build_tokio().load()?;
    let too_long = "x".repeat(65);
    for id in ["short", "has spaces in it!", too_long.as_str()] {
        assert!(matches!(
            vault.read_secret(id).await,
            Err(ReadSecretError::InvalidId(_))
        ));
    }
    // well formed but never created
    assert_eq!(
        vault.read_secret("abcdefgh").await,
        Err(ReadSecretError::NotFound)
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn unread_secrets_are_deleted_when_they_expire() -> eyre::Result<()> {
    init_logging();
    let runtime = TokioRuntime::current();
    let storage = InMemoryStorage::with_clock(runtime.clone());
    let vault = Vault::builder(runtime)
        .with_storage(storage.clone())
        .load()?;

    let created = vault
        .create_secret(payload(2), Some(Duration::from_secs(300)))
        .await?;
    let key = StorageKey::secret_record_path(&created.id);
    assert!(storage.contains(&key));

    tokio::time::sleep(Duration::from_secs(301)).await;

    assert!(!storage.contains(&key));
    assert_eq!(
        vault.read_secret(created.id.as_str()).await,
        Err(ReadSecretError::NotFound)
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn records_past_their_deadline_are_refused_on_read() -> eyre::Result<()> {
    init_logging();
    let runtime = TokioRuntime::current();
    let storage = InMemoryStorage::with_clock(runtime.clone());
    let vault = Vault::builder(runtime)
        .with_storage(storage.clone())
        .load()?;

    // Written directly, so no alarm guards it
    let id: volatile::SecretId = "stalerecord00001".parse()?;
    let record = SecretRecord::new(payload(3), vault.now() + Duration::from_secs(60));
    storage
        .put(StorageKey::secret_record_path(&id), record.encode(), None)
        .await?;

    tokio::time::advance(Duration::from_secs(61)).await;

    assert_eq!(
        vault.read_secret(id.as_str()).await,
        Err(ReadSecretError::Expired)
    );
    assert!(!storage.contains(&StorageKey::secret_record_path(&id)));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn client_limits_follow_the_config() -> eyre::Result<()> {
    init_logging();
    let mut config = VaultConfig::default();
    if let Some(rate_limit) = config.rate_limit.as_mut() {
        rate_limit.create_limit = 2;
        rate_limit.window = Duration::from_secs(60);
    }
    let vault = Vault::build_tokio().with_config(config).load()?;

    let mut allowed = Vec::new();
    for _ in 0..3 {
        let decision = vault
            .check_rate_for_client(Scope::Create, Some("198.51.100.7"))
            .await?
            .expect("rate limiting is enabled");
        allowed.push(decision.allowed);
    }
    assert_eq!(allowed, vec![true, true, false]);

    // reads have their own, larger quota
    let read = vault
        .check_rate_for_client(Scope::Read, Some("198.51.100.7"))
        .await?
        .expect("rate limiting is enabled");
    assert!(read.allowed);
    assert_eq!(read.limit, 1000);
    assert_eq!(read.remaining, 999);

    tokio::time::advance(Duration::from_secs(60)).await;
    let after_window = vault
        .check_rate_for_client(Scope::Create, Some("198.51.100.7"))
        .await?
        .expect("rate limiting is enabled");
    assert!(after_window.allowed);
    assert_eq!(after_window.remaining, 1);
    Ok(())
}

#[tokio::test]
async fn denied_checks_report_when_to_retry() -> eyre::Result<()> {
    init_logging();
    let vault = Vault::build_tokio().load()?;
    let fingerprint = volatile::ClientFingerprint::from_address("192.0.2.1");
    let window = Duration::from_secs(90);

    let first = vault
        .check_rate(Scope::Read, &fingerprint, 1, window)
        .await?;
    let second = vault
        .check_rate(Scope::Read, &fingerprint, 1, window)
        .await?;
    assert!(first.allowed);
    assert!(!second.allowed);
    assert_eq!(second.reset_at, first.reset_at);

    let headers = second.quota_headers(vault.now());
    assert!(headers.iter().any(|(name, _)| *name == "Retry-After"));
    assert!(second.retry_after(vault.now()) <= window);
    Ok(())
}

#[tokio::test]
async fn disabled_rate_limiting_allows_everything() -> eyre::Result<()> {
    init_logging();
    let config = VaultConfig {
        rate_limit: None,
        ..Default::default()
    };
    let vault = Vault::build_tokio().with_config(config).load()?;
    for _ in 0..5 {
        assert_eq!(vault.check_rate_for_client(Scope::Create, None).await?, None);
    }
    Ok(())
}

#[tokio::test]
async fn stopped_vault_refuses_work() -> eyre::Result<()> {
    init_logging();
    let vault = Vault::build_tokio().load()?;
    let created = vault.create_secret(payload(4), None).await?;

    vault.stop().await;

    assert_eq!(
        vault.read_secret(created.id.as_str()).await,
        Err(ReadSecretError::Stopped(Stopped))
    );
    assert_eq!(
        vault.create_secret(payload(5), None).await,
        Err(CreateSecretError::Stopped(Stopped))
    );
    Ok(())
}

#[tokio::test]
async fn secrets_outlive_their_worker() -> eyre::Result<()> {
    init_logging();
    let storage = InMemoryStorage::new();
    let first = Vault::build_tokio()
        .with_storage(storage.clone())
        .load()?;
    let created = first.create_secret(payload(6), None).await?;
    first.stop().await;

    let second = Vault::build_tokio().with_storage(storage).load()?;
    assert_eq!(second.read_secret(created.id.as_str()).await?, payload(6));
    Ok(())
}
