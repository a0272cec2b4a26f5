// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutation queue types.
//!
//! Every local write is recorded as a queue item: a durable, ordered
//! description of one operation awaiting delivery to the remote service.
//! Items carry a denormalized copy of the entity payload so the drain
//! never re-reads the entity table mid-pass; a later local edit cannot
//! race with an in-progress delivery (at the cost of possibly shipping a
//! stale payload).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entity::EntityKind;
use crate::error::{Error, Result};

/// Default number of delivery attempts before an item is parked as failed.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// The remote operation a queue item describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `POST /{collection}` — the reply carries the server-assigned id.
    Create,
    /// `PUT /{collection}/{server_id}`.
    Update,
    /// `DELETE /{collection}/{server_id}`.
    Delete,
}

impl Operation {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Returns true if this operation targets an already-created remote
    /// resource and therefore needs a server id before it can be sent.
    pub fn needs_server_id(&self) -> bool {
        matches!(self, Operation::Update | Operation::Delete)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            _ => Err(Error::InvalidOperation(s.to_string())),
        }
    }
}

/// One durable mutation awaiting delivery.
///
/// Items are replayed in `created_at` order per user, which approximates
/// the causal order of local writes. An item whose `attempts` has reached
/// `max_retries` is exhausted: retained, excluded from automatic drains,
/// and surfaced as failed until manually reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Local auto-increment identifier.
    pub id: i64,
    /// The owning user; each user's queue drains independently.
    pub user_id: String,
    pub operation: Operation,
    pub kind: EntityKind,
    /// Local id of the entity this mutation targets.
    pub entity_local_id: i64,
    /// Server id of the target, when known at enqueue time.
    pub server_id: Option<String>,
    /// Denormalized entity payload for the remote call.
    pub payload: serde_json::Value,
    /// Number of failed delivery attempts so far.
    pub attempts: u32,
    pub max_retries: u32,
    /// Message from the most recent failed attempt.
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl QueueItem {
    /// Returns true if this item has used up all its automatic retries.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_retries
    }
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
