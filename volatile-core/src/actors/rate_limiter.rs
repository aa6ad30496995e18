//! The rate limiter shard actor.
//!
//! A shard owns the fixed-window counters of every client routed to it and
//! exposes a single operation, check-and-increment. All checks against a
//! shard are serialized, so a burst from one client is never miscounted.

mod actor;
pub use actor::{CheckAndIncrement, RateLimiterShard};
mod counter;
pub use counter::RateCounterEntry;
mod decision;
pub use decision::RateDecision;
mod errors;
pub use errors::RateLimitError;
mod run;
