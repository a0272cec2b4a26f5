// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed local store.
//!
//! The [`Store`] struct provides all data access: one table per entity
//! kind (shared column shape), the mutation queue, and device-local
//! alerts. It is the single write path for the client: every entity
//! mutation appends a queue item in the same transaction, and the sync
//! manager later drains that queue against the remote service.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::clock::{ClockSource, SystemClock};
use crate::entity::{Alert, AlertSeverity, EntityKind, Record, SyncState};
use crate::error::{Error, Result};
use crate::mutation::{Operation, QueueItem, DEFAULT_MAX_RETRIES};

/// SQL schema for the mutation queue and alert tables.
///
/// Entity tables are created per kind in [`run_migrations`]; they all
/// share the same column shape.
pub const SCHEMA: &str = r#"
-- Durable record of operations awaiting delivery to the remote service
CREATE TABLE IF NOT EXISTS mutation_queue (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    operation TEXT NOT NULL,
    entity_kind TEXT NOT NULL,
    entity_local_id INTEGER NOT NULL,
    server_id TEXT,
    payload TEXT NOT NULL,
    attempts INTEGER NOT NULL DEFAULT 0,
    max_retries INTEGER NOT NULL DEFAULT 5,
    last_error TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    last_attempt_at TEXT
);

-- Device-local alerts; never mirrored remotely
CREATE TABLE IF NOT EXISTS alerts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    severity TEXT NOT NULL,
    message TEXT NOT NULL,
    dismissed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_queue_user_created ON mutation_queue(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_alerts_user ON alerts(user_id, dismissed);
"#;

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T>(value: &str, column: &str) -> std::result::Result<T, rusqlite::Error>
where
    T: FromStr,
{
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

/// Parse a JSON payload from the database.
fn parse_json(value: &str, column: &str) -> std::result::Result<serde_json::Value, rusqlite::Error> {
    serde_json::from_str(value).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid JSON in column '{column}'"
            ))),
        )
    })
}

/// Run schema creation and all migrations on a database connection.
///
/// Applies the canonical schema and runs idempotent migrations to
/// upgrade older databases that may be missing columns.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    // Entity tables share one shape; kind-specific fields live in the
    // JSON payload column.
    for kind in EntityKind::ALL {
        let table = kind.table();
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                 local_id INTEGER PRIMARY KEY AUTOINCREMENT,
                 user_id TEXT NOT NULL,
                 server_id TEXT,
                 sync_state TEXT NOT NULL DEFAULT 'unsynced',
                 payload TEXT NOT NULL,
                 created_at TEXT NOT NULL,
                 updated_at TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_{table}_user ON {table}(user_id);
             CREATE INDEX IF NOT EXISTS idx_{table}_state ON {table}(sync_state);"
        ))?;
    }

    migrate_add_last_attempt(conn)?;
    Ok(())
}

/// Migration: add the last_attempt_at column to pre-existing queues.
fn migrate_add_last_attempt(conn: &Connection) -> Result<()> {
    let has_column: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM pragma_table_info('mutation_queue') WHERE name = 'last_attempt_at'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);

    if !has_column {
        conn.execute("ALTER TABLE mutation_queue ADD COLUMN last_attempt_at TEXT", [])?;
    }
    Ok(())
}

/// SQLite database connection with carelog store operations.
pub struct Store {
    /// The underlying SQLite connection.
    pub conn: Connection,
    clock: Arc<dyn ClockSource>,
}

impl Store {
    /// Open a store at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock))
    }

    /// Open a store at the given path with a custom clock source.
    pub fn open_with_clock(path: &Path, clock: Arc<dyn ClockSource>) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL mode for concurrent readers while the drain writes
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let store = Store { conn, clock };
        run_migrations(&store.conn)?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::in_memory_with_clock(Arc::new(SystemClock))
    }

    /// Open an in-memory store with a custom clock source (for testing).
    pub fn in_memory_with_clock(clock: Arc<dyn ClockSource>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Store { conn, clock };
        run_migrations(&store.conn)?;
        Ok(store)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ------------------------------------------------------------------
    // Single write path: entity mutation + queue append, one transaction
    // ------------------------------------------------------------------

    /// Create an entity locally and enqueue its remote CREATE.
    ///
    /// Returns `(entity_local_id, queue_item_id)`.
    pub fn create_entity(
        &self,
        kind: EntityKind,
        user_id: &str,
        payload: &serde_json::Value,
    ) -> Result<(i64, i64)> {
        let now = self.now();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            &format!(
                "INSERT INTO {} (user_id, sync_state, payload, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                kind.table()
            ),
            params![
                user_id,
                SyncState::Unsynced.as_str(),
                payload.to_string(),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;
        let local_id = tx.last_insert_rowid();

        let queue_id = enqueue_in(&tx, user_id, Operation::Create, kind, local_id, payload, None, now)?;
        tx.commit()?;

        tracing::debug!("created {kind} #{local_id} for {user_id}, queued #{queue_id}");
        Ok((local_id, queue_id))
    }

    /// Update an entity locally and enqueue its remote UPDATE.
    ///
    /// The queue row carries the entity's server id when one is already
    /// known; otherwise the drain resolves it after the CREATE lands.
    pub fn update_entity(
        &self,
        kind: EntityKind,
        local_id: i64,
        payload: &serde_json::Value,
    ) -> Result<i64> {
        let now = self.now();
        let tx = self.conn.unchecked_transaction()?;

        let row: Option<(String, Option<String>)> = tx
            .query_row(
                &format!(
                    "SELECT user_id, server_id FROM {} WHERE local_id = ?1",
                    kind.table()
                ),
                params![local_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (user_id, server_id) = row.ok_or_else(|| Error::RecordNotFound {
            kind: kind.to_string(),
            local_id,
        })?;

        tx.execute(
            &format!(
                "UPDATE {} SET payload = ?1, sync_state = ?2, updated_at = ?3 WHERE local_id = ?4",
                kind.table()
            ),
            params![
                payload.to_string(),
                SyncState::Unsynced.as_str(),
                now.to_rfc3339(),
                local_id,
            ],
        )?;

        let queue_id = enqueue_in(
            &tx,
            &user_id,
            Operation::Update,
            kind,
            local_id,
            payload,
            server_id.as_deref(),
            now,
        )?;
        tx.commit()?;

        tracing::debug!("updated {kind} #{local_id}, queued #{queue_id}");
        Ok(queue_id)
    }

    /// Delete an entity locally and enqueue its remote DELETE.
    pub fn delete_entity(&self, kind: EntityKind, local_id: i64) -> Result<i64> {
        let now = self.now();
        let tx = self.conn.unchecked_transaction()?;

        let row: Option<(String, Option<String>)> = tx
            .query_row(
                &format!(
                    "SELECT user_id, server_id FROM {} WHERE local_id = ?1",
                    kind.table()
                ),
                params![local_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (user_id, server_id) = row.ok_or_else(|| Error::RecordNotFound {
            kind: kind.to_string(),
            local_id,
        })?;

        tx.execute(
            &format!("DELETE FROM {} WHERE local_id = ?1", kind.table()),
            params![local_id],
        )?;

        let queue_id = enqueue_in(
            &tx,
            &user_id,
            Operation::Delete,
            kind,
            local_id,
            &serde_json::Value::Null,
            server_id.as_deref(),
            now,
        )?;
        tx.commit()?;

        tracing::debug!("deleted {kind} #{local_id}, queued #{queue_id}");
        Ok(queue_id)
    }

    // ------------------------------------------------------------------
    // Mutation queue
    // ------------------------------------------------------------------

    /// Append a raw queue item outside the entity write path.
    pub fn enqueue(
        &self,
        user_id: &str,
        operation: Operation,
        kind: EntityKind,
        entity_local_id: i64,
        payload: &serde_json::Value,
        server_id: Option<&str>,
    ) -> Result<i64> {
        let now = self.now();
        enqueue_in(&self.conn, user_id, operation, kind, entity_local_id, payload, server_id, now)
    }

    /// Fetch one queue item by id.
    pub fn queue_item(&self, id: i64) -> Result<QueueItem> {
        self.conn
            .query_row(
                "SELECT id, user_id, operation, entity_kind, entity_local_id, server_id,
                        payload, attempts, max_retries, last_error, created_at, updated_at,
                        last_attempt_at
                 FROM mutation_queue WHERE id = ?1",
                params![id],
                row_to_queue_item,
            )
            .optional()?
            .ok_or(Error::QueueItemNotFound(id))
    }

    /// Queue items eligible for an automatic drain, oldest first.
    ///
    /// Excludes exhausted items (`attempts >= max_retries`). Ordering is
    /// `created_at` then id, approximating causal order of local writes.
    pub fn pending_for_user(&self, user_id: &str) -> Result<Vec<QueueItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, operation, entity_kind, entity_local_id, server_id,
                    payload, attempts, max_retries, last_error, created_at, updated_at,
                    last_attempt_at
             FROM mutation_queue
             WHERE user_id = ?1 AND attempts < max_retries
             ORDER BY created_at ASC, id ASC",
        )?;
        let items = stmt
            .query_map(params![user_id], row_to_queue_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Queue items that have used up all automatic retries.
    pub fn exhausted_for_user(&self, user_id: &str) -> Result<Vec<QueueItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, operation, entity_kind, entity_local_id, server_id,
                    payload, attempts, max_retries, last_error, created_at, updated_at,
                    last_attempt_at
             FROM mutation_queue
             WHERE user_id = ?1 AND attempts >= max_retries
             ORDER BY created_at ASC, id ASC",
        )?;
        let items = stmt
            .query_map(params![user_id], row_to_queue_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Number of items still eligible for automatic delivery.
    pub fn pending_count(&self, user_id: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM mutation_queue WHERE user_id = ?1 AND attempts < max_retries",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Number of exhausted items awaiting manual retry or discard.
    pub fn failed_count(&self, user_id: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM mutation_queue WHERE user_id = ?1 AND attempts >= max_retries",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Record the start of a delivery attempt.
    ///
    /// Stamps `last_attempt_at` and flips the target entity to in-flight.
    /// The attempt counter itself moves in [`Store::record_failure`] so it
    /// advances exactly once per issued call.
    pub fn begin_attempt(&self, queue_id: i64) -> Result<()> {
        let now = self.now();
        let tx = self.conn.unchecked_transaction()?;

        let item = fetch_target(&tx, queue_id)?;
        tx.execute(
            "UPDATE mutation_queue SET last_attempt_at = ?1, updated_at = ?1 WHERE id = ?2",
            params![now.to_rfc3339(), queue_id],
        )?;
        if item.operation != Operation::Delete {
            tx.execute(
                &format!(
                    "UPDATE {} SET sync_state = ?1 WHERE local_id = ?2",
                    item.kind.table()
                ),
                params![SyncState::InFlight.as_str(), item.entity_local_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Record a successful delivery.
    ///
    /// In one transaction: stamps the entity synced (plus the server id
    /// returned by a CREATE) and removes the queue row. Readers never see
    /// the queue row gone while the entity is still unsynced.
    pub fn mark_delivered(&self, queue_id: i64, server_id: Option<&str>) -> Result<()> {
        let now = self.now();
        let tx = self.conn.unchecked_transaction()?;

        let item = fetch_target(&tx, queue_id)?;
        if item.operation != Operation::Delete {
            tx.execute(
                &format!(
                    "UPDATE {} SET sync_state = ?1, server_id = COALESCE(?2, server_id),
                     updated_at = ?3 WHERE local_id = ?4",
                    item.kind.table()
                ),
                params![
                    SyncState::Synced.as_str(),
                    server_id,
                    now.to_rfc3339(),
                    item.entity_local_id,
                ],
            )?;
        }
        tx.execute("DELETE FROM mutation_queue WHERE id = ?1", params![queue_id])?;
        tx.commit()?;
        Ok(())
    }

    /// Record a failed delivery attempt.
    ///
    /// Increments `attempts`, stores the error, and puts the entity back
    /// to unsynced. A missing queue row is a no-op: failures on the
    /// expected path never escalate.
    pub fn record_failure(&self, queue_id: i64, error: &str) -> Result<()> {
        self.fail_with_attempts(queue_id, error, "attempts + 1")
    }

    /// Park a queue item as exhausted regardless of remaining retries.
    ///
    /// Used to short-circuit permanently failing deliveries (a 4xx will
    /// never succeed no matter how often it is retried).
    pub fn mark_exhausted(&self, queue_id: i64, error: &str) -> Result<()> {
        self.fail_with_attempts(queue_id, error, "max_retries")
    }

    fn fail_with_attempts(&self, queue_id: i64, error: &str, attempts_expr: &str) -> Result<()> {
        let now = self.now();
        let tx = self.conn.unchecked_transaction()?;

        let item = match fetch_target(&tx, queue_id) {
            Ok(item) => item,
            Err(Error::QueueItemNotFound(_)) => return Ok(()),
            Err(e) => return Err(e),
        };
        tx.execute(
            &format!(
                "UPDATE mutation_queue
                 SET attempts = {attempts_expr}, last_error = ?1,
                     last_attempt_at = ?2, updated_at = ?2
                 WHERE id = ?3"
            ),
            params![error, now.to_rfc3339(), queue_id],
        )?;
        if item.operation != Operation::Delete {
            tx.execute(
                &format!(
                    "UPDATE {} SET sync_state = ?1 WHERE local_id = ?2 AND sync_state = ?3",
                    item.kind.table()
                ),
                params![
                    SyncState::Unsynced.as_str(),
                    item.entity_local_id,
                    SyncState::InFlight.as_str(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Manual retry: re-arm every exhausted item for a user.
    ///
    /// Returns the number of items reset.
    pub fn reset_exhausted(&self, user_id: &str) -> Result<usize> {
        let now = self.now();
        let reset = self.conn.execute(
            "UPDATE mutation_queue SET attempts = 0, last_error = NULL, updated_at = ?1
             WHERE user_id = ?2 AND attempts >= max_retries",
            params![now.to_rfc3339(), user_id],
        )?;
        if reset > 0 {
            tracing::info!("reset {reset} exhausted queue items for {user_id}");
        }
        Ok(reset)
    }

    /// Discard one exhausted queue item without delivering it.
    pub fn discard_queue_item(&self, queue_id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM mutation_queue WHERE id = ?1", params![queue_id])?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entity reads
    // ------------------------------------------------------------------

    /// Fetch one entity record.
    pub fn record(&self, kind: EntityKind, local_id: i64) -> Result<Record> {
        self.conn
            .query_row(
                &format!(
                    "SELECT local_id, user_id, server_id, sync_state, payload,
                            created_at, updated_at
                     FROM {} WHERE local_id = ?1",
                    kind.table()
                ),
                params![local_id],
                |row| row_to_record(kind, row),
            )
            .optional()?
            .ok_or_else(|| Error::RecordNotFound {
                kind: kind.to_string(),
                local_id,
            })
    }

    /// Server id of an entity, if it has been created remotely.
    pub fn server_id(&self, kind: EntityKind, local_id: i64) -> Result<Option<String>> {
        let server_id: Option<Option<String>> = self
            .conn
            .query_row(
                &format!("SELECT server_id FROM {} WHERE local_id = ?1", kind.table()),
                params![local_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(server_id.flatten())
    }

    /// All records of one kind for a user, newest first.
    pub fn records_for_user(&self, kind: EntityKind, user_id: &str) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT local_id, user_id, server_id, sync_state, payload, created_at, updated_at
             FROM {} WHERE user_id = ?1 ORDER BY created_at DESC, local_id DESC",
            kind.table()
        ))?;
        let records = stmt
            .query_map(params![user_id], |row| row_to_record(kind, row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Records across all kinds that still await delivery.
    pub fn unsynced_for_user(&self, user_id: &str) -> Result<Vec<Record>> {
        let mut out = Vec::new();
        for kind in EntityKind::ALL {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT local_id, user_id, server_id, sync_state, payload, created_at, updated_at
                 FROM {} WHERE user_id = ?1 AND sync_state != 'synced'
                 ORDER BY created_at ASC",
                kind.table()
            ))?;
            let records = stmt
                .query_map(params![user_id], |row| row_to_record(kind, row))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            out.extend(records);
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Alerts
    // ------------------------------------------------------------------

    /// Insert a device-local alert.
    pub fn insert_alert(
        &self,
        user_id: &str,
        severity: AlertSeverity,
        message: &str,
    ) -> Result<i64> {
        let now = self.now();
        self.conn.execute(
            "INSERT INTO alerts (user_id, severity, message, dismissed, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![user_id, severity.as_str(), message, now.to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Dismiss an alert so it no longer appears in the recent list.
    pub fn dismiss_alert(&self, alert_id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE alerts SET dismissed = 1 WHERE id = ?1",
            params![alert_id],
        )?;
        Ok(())
    }

    /// Recent undismissed alerts for a user, newest first.
    pub fn recent_alerts(&self, user_id: &str, limit: u32) -> Result<Vec<Alert>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, severity, message, dismissed, created_at
             FROM alerts
             WHERE user_id = ?1 AND dismissed = 0
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
        )?;
        let alerts = stmt
            .query_map(params![user_id, limit], row_to_alert)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(alerts)
    }
}

/// The queue fields the drain-side store operations need to touch the
/// originating entity.
struct QueueTarget {
    operation: Operation,
    kind: EntityKind,
    entity_local_id: i64,
}

fn fetch_target(conn: &Connection, queue_id: i64) -> Result<QueueTarget> {
    conn.query_row(
        "SELECT operation, entity_kind, entity_local_id FROM mutation_queue WHERE id = ?1",
        params![queue_id],
        |row| {
            let operation: String = row.get(0)?;
            let kind: String = row.get(1)?;
            Ok(QueueTarget {
                operation: parse_db(&operation, "operation")?,
                kind: parse_db(&kind, "entity_kind")?,
                entity_local_id: row.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or(Error::QueueItemNotFound(queue_id))
}

#[allow(clippy::too_many_arguments)]
fn enqueue_in(
    conn: &Connection,
    user_id: &str,
    operation: Operation,
    kind: EntityKind,
    entity_local_id: i64,
    payload: &serde_json::Value,
    server_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO mutation_queue
             (user_id, operation, entity_kind, entity_local_id, server_id, payload,
              attempts, max_retries, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?8)",
        params![
            user_id,
            operation.as_str(),
            kind.as_str(),
            entity_local_id,
            server_id,
            payload.to_string(),
            DEFAULT_MAX_RETRIES,
            now.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn row_to_queue_item(row: &Row<'_>) -> std::result::Result<QueueItem, rusqlite::Error> {
    let operation: String = row.get(2)?;
    let kind: String = row.get(3)?;
    let payload: String = row.get(6)?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;
    let last_attempt_at: Option<String> = row.get(12)?;

    Ok(QueueItem {
        id: row.get(0)?,
        user_id: row.get(1)?,
        operation: parse_db(&operation, "operation")?,
        kind: parse_db(&kind, "entity_kind")?,
        entity_local_id: row.get(4)?,
        server_id: row.get(5)?,
        payload: parse_json(&payload, "payload")?,
        attempts: row.get(7)?,
        max_retries: row.get(8)?,
        last_error: row.get(9)?,
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
        last_attempt_at: match last_attempt_at {
            Some(ts) => Some(parse_timestamp(&ts, "last_attempt_at")?),
            None => None,
        },
    })
}

fn row_to_record(kind: EntityKind, row: &Row<'_>) -> std::result::Result<Record, rusqlite::Error> {
    let sync_state: String = row.get(3)?;
    let payload: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Record {
        local_id: row.get(0)?,
        kind,
        user_id: row.get(1)?,
        server_id: row.get(2)?,
        sync_state: parse_db(&sync_state, "sync_state")?,
        payload: parse_json(&payload, "payload")?,
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}

fn row_to_alert(row: &Row<'_>) -> std::result::Result<Alert, rusqlite::Error> {
    let severity: String = row.get(2)?;
    let created_at: String = row.get(5)?;

    Ok(Alert {
        id: row.get(0)?,
        user_id: row.get(1)?,
        severity: parse_db(&severity, "severity")?,
        message: row.get(3)?,
        dismissed: row.get(4)?,
        created_at: parse_timestamp(&created_at, "created_at")?,
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
