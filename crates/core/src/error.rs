// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for carelog-core operations.

use thiserror::Error;

/// All possible errors that can occur in carelog-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("record not found: {kind} #{local_id}")]
    RecordNotFound { kind: String, local_id: i64 },

    #[error("queue item not found: #{0}")]
    QueueItemNotFound(i64),

    #[error(
        "invalid entity kind: '{0}'\n  hint: valid kinds are: measurement, medication, adherence, profile, prescription, visit, referral"
    )]
    InvalidEntityKind(String),

    #[error("invalid operation: '{0}'\n  hint: valid operations are: create, update, delete")]
    InvalidOperation(String),

    #[error("invalid sync state: '{0}'\n  hint: valid states are: unsynced, in_flight, synced")]
    InvalidSyncState(String),

    #[error("invalid alert severity: '{0}'\n  hint: valid severities are: info, warning, critical")]
    InvalidAlertSeverity(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for carelog-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
