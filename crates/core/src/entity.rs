// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core entity types for the carelog client.
//!
//! This module contains the fundamental data types: EntityKind, SyncState,
//! Record, and the device-local Alert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The domain entity kinds mirrored on the remote service.
///
/// Alerts are deliberately absent: the remote API exposes no alert
/// collection, so alerts stay device-local (see [`Alert`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A vital-sign reading (blood pressure, glucose, weight, ...).
    Measurement,
    /// A medication on the patient's list.
    Medication,
    /// A medication adherence record (taken / skipped / missed).
    Adherence,
    /// The patient's profile.
    Profile,
    /// A prescription issued by a clinician.
    Prescription,
    /// A clinic or home visit.
    Visit,
    /// A referral to another facility or specialist.
    Referral,
}

impl EntityKind {
    /// All syncable entity kinds.
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Measurement,
        EntityKind::Medication,
        EntityKind::Adherence,
        EntityKind::Profile,
        EntityKind::Prescription,
        EntityKind::Visit,
        EntityKind::Referral,
    ];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Measurement => "measurement",
            EntityKind::Medication => "medication",
            EntityKind::Adherence => "adherence",
            EntityKind::Profile => "profile",
            EntityKind::Prescription => "prescription",
            EntityKind::Visit => "visit",
            EntityKind::Referral => "referral",
        }
    }

    /// Returns the local SQLite table name for this kind.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Measurement => "measurements",
            EntityKind::Medication => "medications",
            EntityKind::Adherence => "adherence_records",
            EntityKind::Profile => "profiles",
            EntityKind::Prescription => "prescriptions",
            EntityKind::Visit => "visits",
            EntityKind::Referral => "referrals",
        }
    }

    /// Returns the remote REST collection path segment for this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Measurement => "measurements",
            EntityKind::Medication => "medications",
            EntityKind::Adherence => "adherence",
            EntityKind::Profile => "profiles",
            EntityKind::Prescription => "prescriptions",
            EntityKind::Visit => "visits",
            EntityKind::Referral => "referrals",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "measurement" => Ok(EntityKind::Measurement),
            "medication" => Ok(EntityKind::Medication),
            "adherence" => Ok(EntityKind::Adherence),
            "profile" => Ok(EntityKind::Profile),
            "prescription" => Ok(EntityKind::Prescription),
            "visit" => Ok(EntityKind::Visit),
            "referral" => Ok(EntityKind::Referral),
            _ => Err(Error::InvalidEntityKind(s.to_string())),
        }
    }
}

/// Delivery state of a locally persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Mutated locally, not yet delivered to the remote service.
    Unsynced,
    /// A delivery attempt is currently in progress.
    InFlight,
    /// Delivered; `server_id` is guaranteed to be present.
    Synced,
}

impl SyncState {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Unsynced => "unsynced",
            SyncState::InFlight => "in_flight",
            SyncState::Synced => "synced",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unsynced" => Ok(SyncState::Unsynced),
            "in_flight" => Ok(SyncState::InFlight),
            "synced" => Ok(SyncState::Synced),
            _ => Err(Error::InvalidSyncState(s.to_string())),
        }
    }
}

/// One row of an entity table.
///
/// All entity kinds share this shape; kind-specific fields live in the
/// denormalized JSON `payload`, which is also the body shipped to the
/// remote service. The local id is stable for the life of the install;
/// the server id appears only after a successful remote create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier assigned by the local store (SQLite rowid).
    pub local_id: i64,
    /// Which entity table this row belongs to.
    pub kind: EntityKind,
    /// The owning user.
    pub user_id: String,
    /// Identifier assigned by the remote service, if ever created there.
    pub server_id: Option<String>,
    /// Delivery state. Invariant: `Synced` implies `server_id.is_some()`.
    pub sync_state: SyncState,
    /// Entity-specific fields as sent to the remote API.
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Returns true if this record still awaits delivery.
    pub fn is_pending(&self) -> bool {
        self.sync_state != SyncState::Synced
    }
}

/// Severity of a device-local alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "info" => Ok(AlertSeverity::Info),
            "warning" => Ok(AlertSeverity::Warning),
            "critical" => Ok(AlertSeverity::Critical),
            _ => Err(Error::InvalidAlertSeverity(s.to_string())),
        }
    }
}

/// A device-local alert shown to the user (threshold breach, missed dose).
///
/// Alerts never enter the mutation queue and are never mirrored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub user_id: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub dismissed: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
