// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! carelog-core: Local persistence for the carelog offline-first client.
//!
//! This crate provides the domain entity types, the durable SQLite store,
//! and the mutation queue that records local writes awaiting delivery to
//! the remote service. It has no network awareness; draining the queue is
//! the job of the `carelog-sync` crate.

pub mod clock;
pub mod entity;
pub mod error;
pub mod mutation;
pub mod store;

#[cfg(test)]
mod test_helpers;

pub use clock::{ClockSource, SystemClock};
pub use entity::{Alert, AlertSeverity, EntityKind, Record, SyncState};
pub use error::{Error, Result};
pub use mutation::{Operation, QueueItem, DEFAULT_MAX_RETRIES};
pub use store::Store;
