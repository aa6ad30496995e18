use std::collections::VecDeque;

use volatile_core::{
    ActorResult, AddressableActor, RequestId, UnixTimestamp,
    io::{ActorIoResult, ActorIoTask, IoResult},
};

use crate::storage::Storage;

/// An actor together with the one wake-up slot the substrate keeps for it
pub(crate) struct Hosted<A> {
    pub(crate) actor: A,
    pub(crate) alarm: Option<UnixTimestamp>,
}

impl<A: AddressableActor> Hosted<A> {
    pub(crate) fn new(actor: A) -> Self {
        Self { actor, alarm: None }
    }

    pub(crate) fn request(
        &mut self,
        storage: &mut Storage,
        now: UnixTimestamp,
        request: A::Request,
    ) -> A::Reply {
        let request_id = RequestId::new();
        let result = self.actor.handle_request(now, request_id, request);
        let mut replies = self.run_to_completion(storage, now, result);
        let position = replies
            .iter()
            .position(|(id, _)| *id == request_id)
            .expect("actor did not reply to request");
        replies.swap_remove(position).1
    }

    pub(crate) fn fire_alarm(&mut self, storage: &mut Storage, now: UnixTimestamp) {
        self.alarm = None;
        let result = self.actor.handle_alarm(now);
        let replies = self.run_to_completion(storage, now, result);
        assert!(replies.is_empty(), "alarm produced replies: {replies:?}");
    }

    /// Execute IO tasks, feeding results back, until the actor is idle
    fn run_to_completion(
        &mut self,
        storage: &mut Storage,
        now: UnixTimestamp,
        initial: ActorResult<A::Reply>,
    ) -> Vec<(RequestId, A::Reply)> {
        let mut replies = initial.replies;
        let mut pending = VecDeque::from(initial.io_tasks);
        while let Some(task) = pending.pop_front() {
            tracing::trace!(task_id = ?task.task_id, %now, "executing io task");
            let payload = match task.action {
                ActorIoTask::Storage(storage_task) => {
                    ActorIoResult::Storage(storage.execute(storage_task, now))
                }
                ActorIoTask::SetAlarm { at } => {
                    self.alarm = Some(at);
                    ActorIoResult::AlarmSet
                }
                ActorIoTask::CancelAlarm => {
                    self.alarm = None;
                    ActorIoResult::AlarmCancelled
                }
            };
            let ActorResult {
                io_tasks,
                replies: new_replies,
            } = self.actor.handle_io_complete(
                now,
                IoResult {
                    task_id: task.task_id,
                    payload,
                },
            );
            pending.extend(io_tasks);
            replies.extend(new_replies);
        }
        replies
    }
}
