use std::sync::atomic::AtomicUsize;

static LAST_REQUEST_ID: AtomicUsize = AtomicUsize::new(0);

/// Correlates a request handed to an actor with the reply it eventually emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(usize);

impl RequestId {
    pub fn new() -> Self {
        let id = LAST_REQUEST_ID.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        RequestId(id)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
