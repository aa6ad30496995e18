use volatile_core::{
    AllocationExhausted, BadPayload, BadSecretId, RateLimitError, ReadError, io::StorageError,
};

use crate::Stopped;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateSecretError {
    #[error(transparent)]
    BadPayload(#[from] BadPayload),
    #[error(transparent)]
    AllocationExhausted(#[from] AllocationExhausted),
    #[error(transparent)]
    Storage(StorageError),
    #[error(transparent)]
    Stopped(#[from] Stopped),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadSecretError {
    #[error(transparent)]
    InvalidId(#[from] BadSecretId),
    #[error("secret not found")]
    NotFound,
    #[error("secret has expired")]
    Expired,
    #[error(transparent)]
    Storage(StorageError),
    #[error(transparent)]
    Stopped(#[from] Stopped),
}

impl From<ReadError> for ReadSecretError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::NotFound => ReadSecretError::NotFound,
            ReadError::Expired => ReadSecretError::Expired,
            ReadError::Storage(e) => ReadSecretError::Storage(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckRateError {
    #[error("empty rate limit key")]
    BadKey,
    #[error("rate limit and window must be positive")]
    BadLimit,
    #[error(transparent)]
    Storage(StorageError),
    #[error(transparent)]
    Stopped(#[from] Stopped),
}

impl From<RateLimitError> for CheckRateError {
    fn from(err: RateLimitError) -> Self {
        match err {
            RateLimitError::BadKey => CheckRateError::BadKey,
            RateLimitError::BadLimit => CheckRateError::BadLimit,
            RateLimitError::Storage(e) => CheckRateError::Storage(e),
        }
    }
}
