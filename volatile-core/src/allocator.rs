use rand::{CryptoRng, Rng};

use crate::{SecretId, secret_id::DEFAULT_ID_LEN};

/// How many identifiers are tried before allocation gives up
pub const MAX_ALLOCATION_ATTEMPTS: usize = 5;

/// Picks identifiers for new secrets.
///
/// The allocator does no IO. The caller asks for a candidate, tries to store
/// the secret in that candidate's actor and, on a collision, asks again.
/// Any other store failure should end the allocation immediately.
///
/// ```rust
/// use rand::{SeedableRng, rngs::StdRng};
/// use volatile_core::{AllocationStep, IdAllocator};
///
/// let mut rng = StdRng::from_os_rng();
/// let mut allocator = IdAllocator::default();
/// let mut tried = 0;
/// while let AllocationStep::Attempt(_id) = allocator.next_candidate(&mut rng) {
///     // pretend every candidate collides
///     tried += 1;
/// }
/// assert_eq!(tried, 5);
/// ```
#[derive(Debug, Clone)]
pub struct IdAllocator {
    id_len: usize,
    max_attempts: usize,
    attempts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationStep {
    /// Try to store the secret under this identifier
    Attempt(SecretId),
    /// Every attempt collided
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("failed to allocate a unique secret id after {attempts} attempts")]
pub struct AllocationExhausted {
    pub attempts: usize,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LEN)
    }
}

impl IdAllocator {
    pub fn new(id_len: usize) -> Self {
        Self {
            id_len,
            max_attempts: MAX_ALLOCATION_ATTEMPTS,
            attempts: 0,
        }
    }

    pub fn next_candidate<R: Rng + CryptoRng>(&mut self, rng: &mut R) -> AllocationStep {
        if self.attempts >= self.max_attempts {
            tracing::warn!(attempts = self.attempts, "secret id allocation exhausted");
            return AllocationStep::Exhausted;
        }
        self.attempts += 1;
        let id = SecretId::new_with_rng(rng, self.id_len);
        if self.attempts > 1 {
            tracing::warn!(attempt = self.attempts, "retrying secret id allocation after collision");
        }
        AllocationStep::Attempt(id)
    }

    pub fn exhausted(&self) -> AllocationExhausted {
        AllocationExhausted {
            attempts: self.attempts,
        }
    }
}
