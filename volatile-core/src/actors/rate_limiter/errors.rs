use crate::io::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit key must not be empty")]
    BadKey,
    #[error("rate limit and window must both be positive")]
    BadLimit,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
