/// Returned by any vault operation issued after [`Vault::stop`](crate::Vault::stop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("the vault has been stopped")]
pub struct Stopped;
