/// A failure reported by the durable storage layer.
///
/// The vault never retries these; they are handed back to whoever issued
/// the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("storage error: {0}")]
pub struct StorageError(String);

impl StorageError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        Self(msg.into())
    }
}
