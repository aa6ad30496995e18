//! The per-identifier secret actor.
//!
//! Each secret identifier names exactly one actor which owns at most one
//! [`SecretRecord`](crate::SecretRecord). Its life is
//! `EMPTY -> STORED -> (BURNED | EXPIRED)`, after which it behaves exactly
//! like `EMPTY` again:
//!
//! - `StoreIfAbsent` fails with [`StoreError::Collision`] while a record is
//!   present, otherwise persists it and schedules a wake-up at its expiry.
//! - `ReadAndBurn` deletes and returns the record in the same step. A record
//!   past its expiry is deleted and reported as [`ReadError::Expired`]
//!   whether or not the wake-up has fired yet.
//! - The expiry wake-up deletes whatever record is still present, and is a
//!   no-op if there is none.

mod actor;
pub use actor::{SecretActor, SecretReply, SecretRequest};
mod errors;
pub use errors::{ReadError, StoreError};
mod run;
