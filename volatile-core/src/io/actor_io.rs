use crate::UnixTimestamp;

use super::{StorageError, StorageResult, StorageTask};

/// An IO request emitted by an actor.
///
/// Besides storage, an actor owns a single wake-up slot. `SetAlarm` replaces
/// whatever wake-up was scheduled before and `CancelAlarm` clears the slot.
/// When the alarm fires the host delivers it back to the actor through its
/// normal input queue, so it is ordered with every other operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActorIoTask {
    Storage(StorageTask),
    SetAlarm { at: UnixTimestamp },
    CancelAlarm,
}

#[derive(Debug, Clone)]
pub enum ActorIoResult {
    Storage(Result<StorageResult, StorageError>),
    AlarmSet,
    AlarmCancelled,
}
