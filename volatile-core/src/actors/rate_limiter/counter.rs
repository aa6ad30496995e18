use std::time::Duration;

use crate::UnixTimestamp;

use super::RateDecision;

/// A fixed-window counter as persisted by a shard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateCounterEntry {
    pub count: u32,
    pub window_reset_at: UnixTimestamp,
}

impl RateCounterEntry {
    /// Count one more request against this counter.
    ///
    /// A counter whose window has elapsed (or which was never initialised)
    /// starts a fresh window at `now`.
    pub fn increment(
        self,
        now: UnixTimestamp,
        limit: u32,
        window: Duration,
    ) -> (RateCounterEntry, RateDecision) {
        let mut entry = self;
        if now >= entry.window_reset_at {
            entry = RateCounterEntry {
                count: 0,
                window_reset_at: now + window,
            };
        }
        entry.count = entry.count.saturating_add(1);
        let decision = RateDecision {
            allowed: entry.count <= limit,
            limit,
            remaining: limit.saturating_sub(entry.count),
            reset_at: entry.window_reset_at,
        };
        (entry, decision)
    }

    /// Encodes as a two element CBOR array: `[count, window_reset_at_millis]`
    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = minicbor::Encoder::new(Vec::new());
        // Writing into a Vec cannot fail
        let _ = encoder
            .array(2)
            .and_then(|e| e.u32(self.count))
            .and_then(|e| e.u64(u64::from(self.window_reset_at)));
        encoder.into_writer()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, minicbor::decode::Error> {
        let mut decoder = minicbor::Decoder::new(bytes);
        if decoder.array()? != Some(2) {
            return Err(minicbor::decode::Error::message("expected a two element array"));
        }
        let count = decoder.u32()?;
        let window_reset_at = UnixTimestamp::from(decoder.u64()?);
        Ok(Self {
            count,
            window_reset_at,
        })
    }
}
