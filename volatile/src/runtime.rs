use std::time::Duration;

use futures::Future;
use volatile_core::UnixTimestamp;

#[cfg(feature = "tokio")]
pub mod tokio;

/// Where the vault reads the current time from.
///
/// Every deadline the actors see is computed from this clock, so a runtime
/// whose timers can be paused (as in tests) should report time from the same
/// source its timers use.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> UnixTimestamp;
}

/// The wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimestamp {
        UnixTimestamp::now()
    }
}

/// The executor the vault spawns its actor workers onto.
pub trait RuntimeHandle: Clock + Clone {
    type Sleep: Future<Output = ()> + Send + 'static;

    fn spawn<F>(&self, f: F)
    where
        F: Future<Output = ()> + Send + 'static;

    /// A future which resolves once `duration` has elapsed on this runtime's timer
    fn sleep(&self, duration: Duration) -> Self::Sleep;
}
