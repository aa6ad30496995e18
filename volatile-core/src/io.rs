//! The IO vocabulary shared by every actor.
//!
//! Actors never perform IO themselves. Each step returns a list of
//! [`IoTask`]s which the caller must execute (against real storage, a timer,
//! or a test double) and feed back as [`IoResult`]s.

mod actor_io;
pub use actor_io::{ActorIoResult, ActorIoTask};
mod io_result;
pub use io_result::IoResult;
mod io_task;
pub use io_task::IoTask;
mod io_task_id;
pub use io_task_id::IoTaskId;
mod storage_error;
pub use storage_error::StorageError;
mod storage_result;
pub use storage_result::StorageResult;
mod storage_task;
pub use storage_task::StorageTask;
