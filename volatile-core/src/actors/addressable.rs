use std::fmt::Debug;

use crate::{
    UnixTimestamp,
    io::{ActorIoResult, IoResult},
};

use super::{ActorResult, RequestId};

/// The interface a host uses to run an actor.
///
/// Hosts must deliver inputs to one actor one at a time and must execute the
/// returned IO tasks, feeding each completion back through
/// [`handle_io_complete`](Self::handle_io_complete). Different actors share
/// nothing and may be driven in parallel.
pub trait AddressableActor: Send + 'static {
    type Request: Debug + Send;
    type Reply: Debug + Send;

    fn handle_request(
        &mut self,
        now: UnixTimestamp,
        request_id: RequestId,
        request: Self::Request,
    ) -> ActorResult<Self::Reply>;

    fn handle_io_complete(
        &mut self,
        now: UnixTimestamp,
        result: IoResult<ActorIoResult>,
    ) -> ActorResult<Self::Reply>;

    /// Called when the wake-up the actor scheduled with
    /// [`ActorIoTask::SetAlarm`](crate::io::ActorIoTask::SetAlarm) fires.
    fn handle_alarm(&mut self, now: UnixTimestamp) -> ActorResult<Self::Reply>;
}
