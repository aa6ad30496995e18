use std::time::Duration;

use crate::UnixTimestamp;

/// The outcome of a check-and-increment.
///
/// Returned whether or not the request is allowed, so callers can always
/// tell clients where they stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: UnixTimestamp,
}

impl RateDecision {
    /// How long a denied client should wait, rounded up to whole seconds and
    /// never less than one second.
    pub fn retry_after(&self, now: UnixTimestamp) -> Duration {
        let wait = self.reset_at.saturating_duration_since(now);
        let secs = wait.as_millis().div_ceil(1000).max(1);
        Duration::from_secs(u64::try_from(secs).unwrap_or(u64::MAX))
    }

    /// The quota headers describing this decision. `Retry-After` is only
    /// present when the request was denied.
    pub fn quota_headers(&self, now: UnixTimestamp) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("X-RateLimit-Limit", self.limit.to_string()),
            ("X-RateLimit-Remaining", self.remaining.to_string()),
            ("X-RateLimit-Reset", self.reset_at.to_string()),
        ];
        if !self.allowed {
            headers.push(("Retry-After", self.retry_after(now).as_secs().to_string()));
        }
        headers
    }
}
