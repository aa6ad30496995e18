use std::{collections::HashMap, time::Duration};

use rand::{SeedableRng, rngs::StdRng};
use volatile_core::{
    AllocationExhausted, AllocationStep, ClientFingerprint, CheckAndIncrement, CounterKey,
    IdAllocator, RateDecision, RateLimitError, RateLimiterShard, ReadError, Scope, SecretActor,
    SecretId, SecretPayload, SecretRecord, SecretReply, SecretRequest, ShardId, ShardRouter,
    StoreError, UnixTimestamp, io::StorageError,
};

mod hosted;
use hosted::Hosted;
mod storage;
pub use storage::Storage;

/// A deterministic, single threaded stand-in for the actor substrate.
///
/// Every request runs to completion synchronously, time only moves when
/// [`advance`](Substrate::advance) is called, and alarms fire in order of
/// their deadline as the clock passes them.
pub struct Substrate {
    now: UnixTimestamp,
    rng: StdRng,
    storage: Storage,
    router: ShardRouter,
    secrets: HashMap<SecretId, Hosted<SecretActor>>,
    shards: HashMap<ShardId, Hosted<RateLimiterShard>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateError {
    Exhausted(AllocationExhausted),
    Storage(StorageError),
}

impl Default for Substrate {
    fn default() -> Self {
        Self::new()
    }
}

impl Substrate {
    pub fn new() -> Self {
        Self::new_with_seed(0)
    }

    /// A substrate whose identifier allocation follows `StdRng::seed_from_u64(seed)`
    pub fn new_with_seed(seed: u64) -> Self {
        Substrate {
            now: UnixTimestamp::from_millis(1_700_000_000_000),
            rng: StdRng::seed_from_u64(seed),
            storage: Storage::new(),
            router: ShardRouter::default(),
            secrets: HashMap::new(),
            shards: HashMap::new(),
        }
    }

    pub fn with_router(mut self, router: ShardRouter) -> Self {
        self.router = router;
        self
    }

    pub fn now(&self) -> UnixTimestamp {
        self.now
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    /// The wake-up currently scheduled for the actor of `id`, if any
    pub fn alarm_for(&self, id: &SecretId) -> Option<UnixTimestamp> {
        self.secrets.get(id).and_then(|hosted| hosted.alarm)
    }

    /// Move the clock forward, firing every alarm which falls due on the way
    pub fn advance(&mut self, by: Duration) {
        let target = self.now + by;
        loop {
            let next_due = self
                .secrets
                .iter()
                .filter_map(|(id, hosted)| hosted.alarm.map(|at| (at, id.clone())))
                .filter(|(at, _)| *at <= target)
                .min();
            let Some((at, id)) = next_due else {
                break;
            };
            self.now = self.now.max(at);
            let now = self.now;
            if let Some(hosted) = self.secrets.get_mut(&id) {
                hosted.fire_alarm(&mut self.storage, now);
            }
        }
        self.now = target;
        self.storage.evict_expired(target);
    }

    /// Deliver an expiry wake-up to the actor of `id` now, whether or not one
    /// is scheduled, as a late or duplicated alarm would.
    pub fn fire_alarm(&mut self, id: &SecretId) {
        let now = self.now;
        let hosted = self
            .secrets
            .entry(id.clone())
            .or_insert_with(|| Hosted::new(SecretActor::new(now, id.clone())));
        hosted.fire_alarm(&mut self.storage, now);
    }

    pub fn store(&mut self, id: &SecretId, record: SecretRecord) -> Result<(), StoreError> {
        self.secret_request(id, SecretRequest::StoreIfAbsent(record))
            .into_stored()
    }

    pub fn read(&mut self, id: &SecretId) -> Result<SecretPayload, ReadError> {
        self.secret_request(id, SecretRequest::ReadAndBurn)
            .into_read()
    }

    /// Allocate an identifier and store `payload` under it, expiring after `ttl`
    pub fn create(
        &mut self,
        payload: SecretPayload,
        ttl: Duration,
    ) -> Result<(SecretId, UnixTimestamp), CreateError> {
        let expires_at = self.now + ttl;
        let mut allocator = IdAllocator::default();
        loop {
            let id = match allocator.next_candidate(&mut self.rng) {
                AllocationStep::Attempt(id) => id,
                AllocationStep::Exhausted => {
                    return Err(CreateError::Exhausted(allocator.exhausted()));
                }
            };
            match self.store(&id, SecretRecord::new(payload.clone(), expires_at)) {
                Ok(()) => return Ok((id, expires_at)),
                Err(StoreError::Collision) => continue,
                Err(StoreError::Storage(e)) => return Err(CreateError::Storage(e)),
            }
        }
    }

    /// Route a check for the client at `address` and run it on its shard
    pub fn check_rate(
        &mut self,
        scope: Scope,
        address: &str,
        limit: u32,
        window: Duration,
    ) -> Result<RateDecision, RateLimitError> {
        let route = self
            .router
            .route(scope, &ClientFingerprint::from_address(address));
        self.check_counter(route.shard, route.counter_key, limit, window)
    }

    pub fn check_counter(
        &mut self,
        shard: ShardId,
        counter_key: CounterKey,
        limit: u32,
        window: Duration,
    ) -> Result<RateDecision, RateLimitError> {
        let now = self.now;
        let hosted = self
            .shards
            .entry(shard)
            .or_insert_with(|| Hosted::new(RateLimiterShard::new(now, shard)));
        hosted.request(
            &mut self.storage,
            now,
            CheckAndIncrement {
                counter_key,
                limit,
                window,
            },
        )
    }

    fn secret_request(&mut self, id: &SecretId, request: SecretRequest) -> SecretReply {
        let now = self.now;
        let hosted = self
            .secrets
            .entry(id.clone())
            .or_insert_with(|| Hosted::new(SecretActor::new(now, id.clone())));
        hosted.request(&mut self.storage, now, request)
    }
}
