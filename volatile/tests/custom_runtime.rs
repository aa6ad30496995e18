#![cfg(feature = "tokio")]

use std::time::Duration;

use volatile::{
    ClientFingerprint, ConfigError, Scope, Vault, VaultConfig,
    runtime::{Clock, RuntimeHandle},
};
use volatile_core::{Nonce, SecretPayload, TtlPolicy, UnixTimestamp};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Spawns onto tokio but reports a frozen time well behind the wall clock
#[derive(Clone)]
struct FrozenClockRuntime {
    handle: tokio::runtime::Handle,
}

impl Clock for FrozenClockRuntime {
    fn now(&self) -> UnixTimestamp {
        UnixTimestamp::from_millis(1_700_000_000_000)
    }
}

impl RuntimeHandle for FrozenClockRuntime {
    type Sleep = tokio::time::Sleep;

    fn spawn<F>(&self, f: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(f);
    }

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        tokio::time::sleep(duration)
    }
}

fn frozen_vault(config: VaultConfig) -> Result<Vault, ConfigError> {
    Vault::builder(FrozenClockRuntime {
        handle: tokio::runtime::Handle::current(),
    })
    .with_config(config)
    .load()
}

#[tokio::test]
async fn counters_survive_when_the_vault_clock_lags_the_wall_clock() -> eyre::Result<()> {
    init_logging();
    let vault = frozen_vault(VaultConfig::default())?;
    let fingerprint = ClientFingerprint::from_address("198.51.100.23");

    let mut allowed = Vec::new();
    for _ in 0..3 {
        let decision = vault
            .check_rate(Scope::Create, &fingerprint, 2, Duration::from_secs(3600))
            .await?;
        allowed.push(decision.allowed);
    }
    assert_eq!(allowed, vec![true, true, false]);
    Ok(())
}

#[tokio::test]
async fn secrets_survive_when_the_vault_clock_lags_the_wall_clock() -> eyre::Result<()> {
    init_logging();
    let vault = frozen_vault(VaultConfig::default())?;
    let payload = SecretPayload::new(vec![5; 16], Nonce::from([5; 12]));

    let created = vault
        .create_secret(payload.clone(), Some(Duration::from_secs(300)))
        .await?;
    assert_eq!(vault.read_secret(created.id.as_str()).await?, payload);
    Ok(())
}

#[tokio::test]
async fn unusable_configs_are_refused_at_load() {
    init_logging();
    let inverted_ttl = VaultConfig {
        ttl: TtlPolicy {
            min: Duration::from_secs(3600),
            default: Duration::from_secs(3600),
            max: Duration::from_secs(60),
        },
        ..Default::default()
    };
    assert!(matches!(
        frozen_vault(inverted_ttl),
        Err(ConfigError::BadTtl)
    ));

    let mut no_creates = VaultConfig::default();
    if let Some(rate_limit) = no_creates.rate_limit.as_mut() {
        rate_limit.create_limit = 0;
    }
    assert!(matches!(
        frozen_vault(no_creates),
        Err(ConfigError::BadRateLimit)
    ));
}
