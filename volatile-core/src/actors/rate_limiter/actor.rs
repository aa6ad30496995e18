use std::time::Duration;

use tracing::Instrument;

use crate::{
    UnixTimestamp,
    actors::{
        ActorResult, AddressableActor, RequestId,
        driver::{Actor, Driver},
    },
    io::{ActorIoResult, ActorIoTask, IoResult, IoTask},
    router::{CounterKey, ShardId},
};

use super::{
    RateDecision, RateLimitError,
    run::{ShardInput, actor_run},
};

/// Count one request against `counter_key`, allowing at most `limit`
/// requests per `window`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckAndIncrement {
    pub counter_key: CounterKey,
    pub limit: u32,
    pub window: Duration,
}

/// The actor owning all counters routed to one shard.
pub struct RateLimiterShard {
    driver: Driver<Self>,
}

impl Actor for RateLimiterShard {
    type IoTaskAction = ActorIoTask;
    type IoResult = ActorIoResult;
    type StepResults = ActorResult<Result<RateDecision, RateLimitError>>;
    type Output = (RequestId, Result<RateDecision, RateLimitError>);
    type Input = ShardInput;

    fn finish_step(
        outputs: Vec<Self::Output>,
        new_io_tasks: Vec<IoTask<ActorIoTask>>,
    ) -> Self::StepResults {
        ActorResult {
            io_tasks: new_io_tasks,
            replies: outputs,
        }
    }
}

impl RateLimiterShard {
    pub fn new(now: UnixTimestamp, shard: ShardId) -> Self {
        let span = tracing::info_span!("rate_limiter_shard", %shard);
        let driver = Driver::spawn(now, move |args| {
            actor_run(args.now, args.rx_input, args.io, shard).instrument(span)
        });
        Self { driver }
    }
}

impl AddressableActor for RateLimiterShard {
    type Request = CheckAndIncrement;
    type Reply = Result<RateDecision, RateLimitError>;

    fn handle_request(
        &mut self,
        now: UnixTimestamp,
        request_id: RequestId,
        request: CheckAndIncrement,
    ) -> ActorResult<Self::Reply> {
        self.driver.handle_input(
            now,
            ShardInput {
                request_id,
                request,
            },
        );
        self.driver.step(now)
    }

    fn handle_io_complete(
        &mut self,
        now: UnixTimestamp,
        result: IoResult<ActorIoResult>,
    ) -> ActorResult<Self::Reply> {
        self.driver.handle_io_complete(now, result);
        self.driver.step(now)
    }

    /// Shards never schedule wake-ups; stale counters are left to storage expiry
    fn handle_alarm(&mut self, now: UnixTimestamp) -> ActorResult<Self::Reply> {
        tracing::warn!("unexpected alarm for rate limiter shard");
        self.driver.step(now)
    }
}
