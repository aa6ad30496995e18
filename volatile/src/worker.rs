use std::{collections::VecDeque, pin::Pin, sync::Arc};

use futures::{FutureExt, StreamExt, channel::mpsc};
use volatile_core::{
    ActorResult, AddressableActor, RequestId,
    io::{ActorIoResult, ActorIoTask, IoResult, IoTask, StorageError, StorageResult, StorageTask},
};

use crate::{
    actor_task::ActorTask,
    registry::{ActorName, Registry},
    runtime::{Clock, RuntimeHandle},
    storage::Storage,
};

enum Event<A: AddressableActor> {
    Task(Option<ActorTask<A>>),
    Alarm,
}

/// Owns one actor and executes everything it asks for.
///
/// Requests are taken from the mailbox one at a time and each is driven
/// until the actor has no IO outstanding, so an actor never sees two
/// requests interleave. The actor has a single alarm slot: setting it
/// replaces the pending timer and cancelling it drops the timer, so a
/// superseded alarm can never fire.
struct Host<A, S, R: RuntimeHandle> {
    actor: A,
    alarm: Option<Pin<Box<R::Sleep>>>,
    storage: S,
    runtime: R,
}

pub(crate) async fn run_actor<A, K, S, R>(
    name: K,
    actor: A,
    mut rx: mpsc::UnboundedReceiver<ActorTask<A>>,
    registry: Arc<Registry<A, K>>,
    storage: S,
    runtime: R,
) where
    A: AddressableActor,
    K: ActorName,
    S: Storage,
    R: RuntimeHandle,
{
    let mut host = Host {
        actor,
        alarm: None,
        storage,
        runtime,
    };

    'worker: loop {
        let event = {
            let alarm = host.alarm.as_mut();
            let next_alarm = async move {
                match alarm {
                    Some(sleep) => sleep.await,
                    None => std::future::pending().await,
                }
            }
            .fuse();
            futures::pin_mut!(next_alarm);
            futures::select! {
                task = rx.next() => Event::Task(task),
                () = next_alarm => Event::Alarm,
            }
        };

        match event {
            Event::Task(Some(task)) => host.handle_task(task).await,
            Event::Task(None) => {
                tracing::trace!(%name, "mailbox closed, stopping actor worker");
                break;
            }
            Event::Alarm => host.handle_alarm().await,
        }

        while host.alarm.is_none() {
            match registry.try_retire(&name, &mut rx) {
                Some(task) => host.handle_task(task).await,
                None => break 'worker,
            }
        }
    }

    registry.worker_finished();
}

impl<A, S, R> Host<A, S, R>
where
    A: AddressableActor,
    S: Storage,
    R: RuntimeHandle,
{
    async fn handle_task(&mut self, ActorTask { request, reply }: ActorTask<A>) {
        let request_id = RequestId::new();
        let result = self
            .actor
            .handle_request(self.runtime.now(), request_id, request);
        let mut replies = self.drive(result).await;

        match replies.iter().position(|(id, _)| *id == request_id) {
            Some(idx) => {
                let (_, response) = replies.swap_remove(idx);
                // The caller may have given up waiting
                let _ = reply.send(response);
            }
            None => tracing::error!(%request_id, "actor finished a request without replying"),
        }
        for (id, _) in replies {
            tracing::warn!(request_id = %id, "discarding reply to an unknown request");
        }
    }

    async fn handle_alarm(&mut self) {
        self.alarm = None;
        let result = self.actor.handle_alarm(self.runtime.now());
        for (id, _) in self.drive(result).await {
            tracing::warn!(request_id = %id, "discarding reply produced by an alarm");
        }
    }

    /// Execute IO for the actor until it stops asking for more
    async fn drive(&mut self, initial: ActorResult<A::Reply>) -> Vec<(RequestId, A::Reply)> {
        let ActorResult {
            io_tasks,
            mut replies,
        } = initial;
        let mut pending = VecDeque::from(io_tasks);

        while let Some(IoTask { task_id, action }) = pending.pop_front() {
            let payload = match action {
                ActorIoTask::Storage(task) => {
                    ActorIoResult::Storage(dispatch_storage_task(task, &self.storage).await)
                }
                ActorIoTask::SetAlarm { at } => {
                    let delay = at.saturating_duration_since(self.runtime.now());
                    tracing::trace!(?delay, "arming alarm");
                    self.alarm = Some(Box::pin(self.runtime.sleep(delay)));
                    ActorIoResult::AlarmSet
                }
                ActorIoTask::CancelAlarm => {
                    self.alarm = None;
                    ActorIoResult::AlarmCancelled
                }
            };
            let result = self
                .actor
                .handle_io_complete(self.runtime.now(), IoResult { task_id, payload });
            pending.extend(result.io_tasks);
            replies.extend(result.replies);
        }
        replies
    }
}

#[tracing::instrument(skip(task, storage))]
pub(crate) async fn dispatch_storage_task<S: Storage>(
    task: StorageTask,
    storage: &S,
) -> Result<StorageResult, StorageError> {
    match task {
        StorageTask::Load { key } => {
            tracing::trace!(%key, "loading key from storage");
            let value = storage.load(key).await?;
            Ok(StorageResult::Load { value })
        }
        StorageTask::Put {
            key,
            value,
            expires_at,
        } => {
            tracing::trace!(%key, ?expires_at, "putting value into storage");
            storage.put(key, value, expires_at).await?;
            Ok(StorageResult::Put)
        }
        StorageTask::Delete { key } => {
            tracing::trace!(%key, "deleting key from storage");
            storage.delete(key).await?;
            Ok(StorageResult::Delete)
        }
    }
}
