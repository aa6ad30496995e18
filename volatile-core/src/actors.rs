//! The two kinds of actor the vault is built from.
//!
//! Actors are passive state machines. A host addresses one by name, hands
//! it requests, alarm wake-ups and IO completions, and executes whatever IO
//! tasks come back. Within one actor every request runs to completion, IO
//! included, before the next one starts; no locking is needed beyond that.

mod actor_result;
pub use actor_result::ActorResult;
mod addressable;
pub use addressable::AddressableActor;
pub(crate) mod driver;
mod executor;
mod io_access;
pub mod rate_limiter;
mod request_id;
pub use request_id::RequestId;
pub mod secret;
