use std::sync::{Arc, Mutex};

use futures::{StreamExt, channel::mpsc};

use crate::{
    StorageKey, UnixTimestamp,
    actors::{RequestId, driver::ActorIo, io_access::IoAccess},
    router::ShardId,
};

use super::{
    CheckAndIncrement, RateCounterEntry, RateDecision, RateLimitError, RateLimiterShard,
};

#[derive(Debug)]
pub(crate) struct ShardInput {
    pub(crate) request_id: RequestId,
    pub(crate) request: CheckAndIncrement,
}

pub(super) async fn actor_run(
    now: Arc<Mutex<UnixTimestamp>>,
    mut rx_input: mpsc::UnboundedReceiver<ShardInput>,
    io: ActorIo<RateLimiterShard>,
    shard: ShardId,
) {
    let io = IoAccess::new(io);
    while let Some(ShardInput {
        request_id,
        request,
    }) = rx_input.next().await
    {
        let current = *now.lock().unwrap();
        let result = check_and_increment(&io, shard, current, request).await;
        io.emit((request_id, result));
    }
}

async fn check_and_increment(
    io: &IoAccess<RateLimiterShard>,
    shard: ShardId,
    now: UnixTimestamp,
    CheckAndIncrement {
        counter_key,
        limit,
        window,
    }: CheckAndIncrement,
) -> Result<RateDecision, RateLimitError> {
    if counter_key.as_str().is_empty() {
        return Err(RateLimitError::BadKey);
    }
    if limit == 0 || window.is_zero() {
        return Err(RateLimitError::BadLimit);
    }

    let key = StorageKey::rate_counter_path(shard, counter_key.as_str());
    let existing = match io.load(key.clone()).await? {
        Some(bytes) => RateCounterEntry::decode(&bytes).unwrap_or_else(|e| {
            tracing::warn!(err=%e, %counter_key, "discarding unreadable rate counter");
            RateCounterEntry::default()
        }),
        None => RateCounterEntry::default(),
    };

    let (entry, decision) = existing.increment(now, limit, window);
    if entry.count == 1 {
        tracing::debug!(%counter_key, reset_at=%entry.window_reset_at, "new rate window");
    }
    io.put(key, entry.encode(), Some(entry.window_reset_at))
        .await?;

    if !decision.allowed {
        tracing::debug!(%counter_key, count = entry.count, limit, "rate limit exceeded");
    }
    Ok(decision)
}
