use std::time::Duration;

/// Bounds applied to a requested time-to-live before a secret is stored.
///
/// Out of range requests are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TtlPolicy {
    pub min: Duration,
    pub default: Duration,
    pub max: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(5 * 60),
            default: Duration::from_secs(24 * 60 * 60),
            max: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

impl TtlPolicy {
    pub fn clamp(&self, requested: Option<Duration>) -> Duration {
        requested.unwrap_or(self.default).clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_range() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.clamp(None), Duration::from_secs(86_400));
        assert_eq!(policy.clamp(Some(Duration::from_secs(1))), policy.min);
        assert_eq!(
            policy.clamp(Some(Duration::from_secs(999 * 86_400))),
            policy.max
        );
        assert_eq!(
            policy.clamp(Some(Duration::from_secs(3600))),
            Duration::from_secs(3600)
        );
    }
}
