// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Drain outcome reporting.
//!
//! Item failures are swallowed inside the drain so one bad item never
//! blocks the rest of the batch; what surfaces to the UI layer is one
//! aggregate report per pass plus the connectivity transitions, never a
//! notification per item.

/// Aggregate outcome of one drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Items for which a remote call was issued.
    pub attempted: u32,
    /// Items delivered and removed from the queue.
    pub delivered: u32,
    /// Items that failed this pass (transient or permanent).
    pub failed: u32,
    /// Items that hit their retry cap this pass (subset of `failed`).
    pub exhausted: u32,
    /// Dependent items deferred because their create has not landed yet.
    pub skipped: u32,
    /// One representative error message, for the aggregate notification.
    pub sample_error: Option<String>,
}

impl DrainReport {
    /// Returns true if every attempted item was delivered.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Returns true if the pass had nothing to do.
    pub fn is_empty(&self) -> bool {
        self.attempted == 0 && self.skipped == 0
    }
}

/// Events surfaced to the embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Connectivity was lost; drains are suppressed until it returns.
    Offline,
    /// Connectivity returned; a drain is starting.
    Online,
    /// A drain pass finished.
    DrainCompleted(DrainReport),
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
