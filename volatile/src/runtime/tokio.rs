use std::time::Duration;

use volatile_core::UnixTimestamp;

use crate::runtime::{Clock, RuntimeHandle};

/// Spawns onto a tokio runtime and tells time by tokio's clock.
///
/// The wall clock is sampled once at construction, after which time advances
/// with `tokio::time::Instant`. This keeps actor deadlines and alarm timers
/// in step when the runtime's clock is paused and advanced by hand.
#[derive(Clone, Debug)]
pub struct TokioRuntime {
    handle: tokio::runtime::Handle,
    origin: UnixTimestamp,
    started: tokio::time::Instant,
}

impl TokioRuntime {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle,
            origin: UnixTimestamp::now(),
            started: tokio::time::Instant::now(),
        }
    }

    /// # Panics
    ///
    /// If called from outside a tokio runtime
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl Clock for TokioRuntime {
    fn now(&self) -> UnixTimestamp {
        self.origin + self.started.elapsed()
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
impl RuntimeHandle for TokioRuntime {
    type Sleep = tokio::time::Sleep;

    fn spawn<F>(&self, f: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(f);
    }

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        let _guard = self.handle.enter();
        tokio::time::sleep(duration)
    }
}
