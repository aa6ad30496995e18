use std::{
    ops::{Add, Sub},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Milliseconds since the unix epoch.
///
/// Every deadline in the vault (secret expiry, rate window resets, alarms) is
/// an absolute `UnixTimestamp`, so actors never read the clock themselves:
/// the caller passes `now` into each step.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UnixTimestamp {
    millis: u128,
}

impl std::fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.millis)
    }
}

impl std::fmt::Debug for UnixTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.millis)
    }
}

impl UnixTimestamp {
    pub fn now() -> Self {
        // A clock before 1970 is treated as the epoch itself
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self { millis }
    }

    pub fn from_millis(millis: u128) -> Self {
        Self { millis }
    }

    pub fn as_millis(&self) -> u128 {
        self.millis
    }

    /// The time remaining until `self`, or zero if `self` is not after `earlier`
    pub fn saturating_duration_since(&self, earlier: UnixTimestamp) -> Duration {
        let diff = self.millis.saturating_sub(earlier.millis);
        Duration::from_millis(u64::try_from(diff).unwrap_or(u64::MAX))
    }
}

impl From<UnixTimestamp> for u64 {
    fn from(ts: UnixTimestamp) -> u64 {
        u64::try_from(ts.millis).unwrap_or(u64::MAX)
    }
}

impl From<u64> for UnixTimestamp {
    fn from(millis: u64) -> Self {
        Self {
            millis: millis as u128,
        }
    }
}

impl Add<Duration> for UnixTimestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            millis: self.millis + rhs.as_millis(),
        }
    }
}

impl Sub<Duration> for UnixTimestamp {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self {
            millis: self.millis.saturating_sub(rhs.as_millis()),
        }
    }
}

impl Sub<UnixTimestamp> for UnixTimestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_duration_since(rhs)
    }
}
