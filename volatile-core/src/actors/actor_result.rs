use crate::io::{ActorIoTask, IoTask};

use super::RequestId;

/// Result of handing an actor a request, an alarm or an IO completion.
#[derive(Debug)]
pub struct ActorResult<Reply> {
    /// IO tasks that need to be executed by the caller.
    pub io_tasks: Vec<IoTask<ActorIoTask>>,
    /// Requests which finished during this step, with their outcome.
    pub replies: Vec<(RequestId, Reply)>,
}
