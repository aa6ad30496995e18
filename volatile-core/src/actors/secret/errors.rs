use crate::io::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The identifier already holds a record; pick another one
    #[error("secret id collision")]
    Collision,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// Never stored, or already burned or expired
    #[error("secret not found or already read")]
    NotFound,
    /// The record was still present but its TTL had passed; it is gone now
    #[error("secret expired")]
    Expired,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
