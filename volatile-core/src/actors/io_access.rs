use crate::{
    StorageKey, UnixTimestamp,
    io::{ActorIoResult, ActorIoTask, StorageError, StorageResult, StorageTask},
};

use super::driver::{Actor, ActorIo};

/// Typed wrappers around [`ActorIo::perform_io`] for the IO every actor uses.
pub(crate) struct IoAccess<A: Actor> {
    io: ActorIo<A>,
}

impl<A: Actor> Clone for IoAccess<A> {
    fn clone(&self) -> Self {
        Self {
            io: self.io.clone(),
        }
    }
}

impl<A> IoAccess<A>
where
    A: Actor<IoTaskAction = ActorIoTask, IoResult = ActorIoResult>,
{
    pub(crate) fn new(io: ActorIo<A>) -> Self {
        Self { io }
    }

    pub(crate) async fn load(&self, key: StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        match self.storage(StorageTask::Load { key }).await? {
            StorageResult::Load { value } => Ok(value),
            other => panic!("Expected Load result, got {other:?}"),
        }
    }

    pub(crate) async fn put(
        &self,
        key: StorageKey,
        value: Vec<u8>,
        expires_at: Option<UnixTimestamp>,
    ) -> Result<(), StorageError> {
        match self
            .storage(StorageTask::Put {
                key,
                value,
                expires_at,
            })
            .await?
        {
            StorageResult::Put => Ok(()),
            other => panic!("Expected Put result, got {other:?}"),
        }
    }

    pub(crate) async fn delete(&self, key: StorageKey) -> Result<(), StorageError> {
        match self.storage(StorageTask::Delete { key }).await? {
            StorageResult::Delete => Ok(()),
            other => panic!("Expected Delete result, got {other:?}"),
        }
    }

    pub(crate) async fn set_alarm(&self, at: UnixTimestamp) {
        match self.io.perform_io(ActorIoTask::SetAlarm { at }).await {
            Some(ActorIoResult::AlarmSet) | None => {}
            Some(other) => panic!("Expected AlarmSet result, got {other:?}"),
        }
    }

    pub(crate) async fn cancel_alarm(&self) {
        match self.io.perform_io(ActorIoTask::CancelAlarm).await {
            Some(ActorIoResult::AlarmCancelled) | None => {}
            Some(other) => panic!("Expected AlarmCancelled result, got {other:?}"),
        }
    }

    pub(crate) fn emit(&self, output: A::Output) {
        self.io.emit_event(output);
    }

    async fn storage(&self, task: StorageTask) -> Result<StorageResult, StorageError> {
        match self.io.perform_io(ActorIoTask::Storage(task)).await {
            Some(ActorIoResult::Storage(result)) => result,
            Some(other) => panic!("Expected Storage result, got {other:?}"),
            None => Err(StorageError::new("storage task abandoned")),
        }
    }
}
