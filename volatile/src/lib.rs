//! # Volatile
//!
//! An ephemeral secret vault. Clients encrypt on their side and hand the
//! vault an opaque ciphertext and nonce; the vault stores it under a fresh
//! random identifier, hands it back exactly once, and forgets it when its
//! time-to-live runs out. Request quotas are enforced per client by a fixed
//! set of rate limiter shards.
//!
//! The state machines live in `volatile-core`. This crate hosts them: every
//! secret and every shard is an actor with its own mailbox and worker task,
//! persisting into a [`Storage`](storage::Storage) and spawned onto a
//! [`RuntimeHandle`](runtime::RuntimeHandle).
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use volatile::{Scope, Vault};
//!
//! let vault = Vault::build_tokio().load()?;
//!
//! if let Some(decision) = vault.check_rate_for_client(Scope::Create, Some("203.0.113.9")).await? {
//!     assert!(decision.allowed);
//! }
//! let created = vault
//!     .create_secret_from_base64url("aGVsbG8", "AAECAwQFBgcICQoL", None)
//!     .await?;
//!
//! let payload = vault.read_secret(created.id.as_str()).await?;
//! assert_eq!(payload.ciphertext, b"hello");
//! # Ok(())
//! # }
//! ```

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rand::SeedableRng;
use volatile_core::{
    AllocationStep, CheckAndIncrement, IdAllocator, RateLimiterShard, SecretActor, SecretRecord,
    SecretReply, SecretRequest, ShardId, ShardRouter, StoreError,
};
pub use volatile_core::{
    ClientFingerprint, RateDecision, Scope, SecretId, SecretPayload, TtlPolicy, UNKNOWN_ADDRESS,
    UnixTimestamp, client_address,
};

mod actor_task;
mod builder;
pub use builder::VaultBuilder;
mod config;
pub use config::{ConfigError, RateLimitConfig, VaultConfig};
mod errors;
pub use errors::{CheckRateError, CreateSecretError, ReadSecretError};
mod registry;
use registry::Registry;
pub mod runtime;
use runtime::{Clock, RuntimeHandle};
mod stopped;
pub use stopped::Stopped;
pub mod storage;
use storage::{InMemoryStorage, Storage};
mod worker;

/// A newly stored secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSecret {
    pub id: SecretId,
    pub expires_at: UnixTimestamp,
}

#[derive(Clone)]
pub struct Vault {
    inner: Arc<Inner>,
}

struct Inner {
    config: VaultConfig,
    router: ShardRouter,
    clock: Arc<dyn Clock>,
    rng: Mutex<rand::rngs::StdRng>,
    secrets: Arc<Registry<SecretActor, SecretId>>,
    shards: Arc<Registry<RateLimiterShard, ShardId>>,
}

impl Vault {
    /// Create a new [`Vault`] which spawns its actors onto the provided runtime
    pub fn builder<R: RuntimeHandle>(runtime: R) -> VaultBuilder<InMemoryStorage, R> {
        VaultBuilder::new(runtime)
    }

    /// Create a new [`Vault`] which spawns its actors onto the current tokio runtime
    #[cfg(feature = "tokio")]
    pub fn build_tokio() -> VaultBuilder<InMemoryStorage, runtime::tokio::TokioRuntime> {
        VaultBuilder::new(runtime::tokio::TokioRuntime::current())
    }

    fn load<S: Storage, R: RuntimeHandle>(
        VaultBuilder {
            storage,
            runtime,
            config,
        }: VaultBuilder<S, R>,
    ) -> Result<Self, ConfigError> {
        let router = config.validate()?;

        let secrets = Registry::new({
            let storage = storage.clone();
            let runtime = runtime.clone();
            move |registry: &Arc<Registry<SecretActor, SecretId>>, secret_id: SecretId, rx| {
                let actor = SecretActor::new(runtime.now(), secret_id.clone());
                runtime.spawn(worker::run_actor(
                    secret_id,
                    actor,
                    rx,
                    registry.clone(),
                    storage.clone(),
                    runtime.clone(),
                ));
            }
        });
        let shards = Registry::new({
            let storage = storage.clone();
            let runtime = runtime.clone();
            move |registry: &Arc<Registry<RateLimiterShard, ShardId>>, shard: ShardId, rx| {
                let actor = RateLimiterShard::new(runtime.now(), shard);
                runtime.spawn(worker::run_actor(
                    shard,
                    actor,
                    rx,
                    registry.clone(),
                    storage.clone(),
                    runtime.clone(),
                ));
            }
        });

        tracing::info!(
            shard_count = router.shard_count(),
            rate_limited = config.rate_limit.is_some(),
            "vault loaded"
        );
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                router,
                clock: Arc::new(runtime),
                rng: Mutex::new(rand::rngs::StdRng::from_os_rng()),
                secrets,
                shards,
            }),
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.inner.config
    }

    /// The vault's notion of the current time, e.g. for [`RateDecision::retry_after`]
    pub fn now(&self) -> UnixTimestamp {
        self.inner.clock.now()
    }

    /// Store `payload` under a freshly allocated identifier.
    ///
    /// `ttl` is clamped to the configured [`TtlPolicy`], falling back to its
    /// default when absent.
    #[tracing::instrument(skip(self, payload))]
    pub async fn create_secret(
        &self,
        payload: SecretPayload,
        ttl: Option<Duration>,
    ) -> Result<CreatedSecret, CreateSecretError> {
        let ttl = self.inner.config.ttl.clamp(ttl);
        let expires_at = self.now() + ttl;
        let mut allocator = IdAllocator::new(self.inner.config.id_len);

        loop {
            let candidate = {
                let mut rng = self.inner.rng.lock().unwrap();
                allocator.next_candidate(&mut *rng)
            };
            let id = match candidate {
                AllocationStep::Attempt(id) => id,
                AllocationStep::Exhausted => return Err(allocator.exhausted().into()),
            };
            let record = SecretRecord::new(payload.clone(), expires_at);
            match self
                .secret_request(id.clone(), SecretRequest::StoreIfAbsent(record))
                .await?
                .into_stored()
            {
                Ok(()) => {
                    tracing::debug!(secret_id = %id, %expires_at, "secret created");
                    return Ok(CreatedSecret { id, expires_at });
                }
                Err(StoreError::Collision) => continue,
                Err(StoreError::Storage(e)) => {
                    tracing::error!(err = %e, "failed to store secret");
                    return Err(CreateSecretError::Storage(e));
                }
            }
        }
    }

    /// Validate a client-encoded ciphertext and nonce, then [`create_secret`](Self::create_secret)
    #[tracing::instrument(skip(self, ciphertext, nonce))]
    pub async fn create_secret_from_base64url(
        &self,
        ciphertext: &str,
        nonce: &str,
        ttl: Option<Duration>,
    ) -> Result<CreatedSecret, CreateSecretError> {
        let payload = SecretPayload::from_base64url(
            ciphertext,
            nonce,
            self.inner.config.max_ciphertext_chars,
        )?;
        self.create_secret(payload, ttl).await
    }

    /// Return the secret stored under `secret_id` and delete it.
    ///
    /// Only the first read of a secret succeeds; every later read, and any
    /// read after the secret's TTL, fails.
    #[tracing::instrument(skip(self))]
    pub async fn read_secret(&self, secret_id: &str) -> Result<SecretPayload, ReadSecretError> {
        let secret_id: SecretId = secret_id.parse()?;
        let payload = self
            .secret_request(secret_id, SecretRequest::ReadAndBurn)
            .await?
            .into_read()?;
        Ok(payload)
    }

    /// Count a request by `fingerprint` against `limit` per `window`
    #[tracing::instrument(skip(self, fingerprint), fields(client = %fingerprint))]
    pub async fn check_rate(
        &self,
        scope: Scope,
        fingerprint: &ClientFingerprint,
        limit: u32,
        window: Duration,
    ) -> Result<RateDecision, CheckRateError> {
        let route = self.inner.router.route(scope, fingerprint);
        let request = CheckAndIncrement {
            counter_key: route.counter_key,
            limit,
            window,
        };
        let rx = self.inner.shards.request(route.shard, request)?;
        let decision = rx.await.map_err(|_| Stopped)??;
        if !decision.allowed {
            tracing::debug!(%scope, reset_at = %decision.reset_at, "rate limit exceeded");
        }
        Ok(decision)
    }

    /// Check the configured limit for `scope` for the client at `address`.
    ///
    /// Returns `None` when rate limiting is disabled. A missing address is
    /// counted as [`UNKNOWN_ADDRESS`].
    pub async fn check_rate_for_client(
        &self,
        scope: Scope,
        address: Option<&str>,
    ) -> Result<Option<RateDecision>, CheckRateError> {
        let Some(rate_limit) = self.inner.config.rate_limit else {
            return Ok(None);
        };
        let fingerprint = ClientFingerprint::from_address(address.unwrap_or(UNKNOWN_ADDRESS));
        let decision = self
            .check_rate(
                scope,
                &fingerprint,
                rate_limit.limit_for(scope),
                rate_limit.window,
            )
            .await?;
        Ok(Some(decision))
    }

    /// Stop the vault.
    ///
    /// New operations fail with [`Stopped`]. Requests already queued are
    /// finished before this returns. Pending expiry alarms are dropped; the
    /// records they guard are still refused once expired and are removed by
    /// the storage's own expiry where it has one.
    pub async fn stop(&self) {
        futures::join!(self.inner.secrets.stop(), self.inner.shards.stop());
        tracing::info!("vault stopped");
    }

    async fn secret_request(
        &self,
        secret_id: SecretId,
        request: SecretRequest,
    ) -> Result<SecretReply, Stopped> {
        let rx = self.inner.secrets.request(secret_id, request)?;
        rx.await.map_err(|_| Stopped)
    }
}
