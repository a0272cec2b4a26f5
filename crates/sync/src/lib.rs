// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! carelog-sync: Queue drain against the remote service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ SyncManager  │────►│  RemoteApi  │────►│   Remote    │
//! │ (drain loop) │◄────│   (trait)   │◄────│   Service   │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌──────────────┐     ┌──────────────────────┐
//! │    Store     │     │ ConnectivityProvider │
//! │ (mutation    │     │ (online transitions) │
//! │  queue)      │     └──────────────────────┘
//! └──────────────┘
//! ```
//!
//! # Features
//!
//! - Sequential, causally ordered drain of the mutation queue per user
//! - Server-id reconciliation after remote creates
//! - Transient/permanent error classification with a retry cap
//! - Drain triggers: startup, reconnect, periodic timer
//! - Injectable remote API and connectivity traits for testing

pub mod api;
pub mod classify;
pub mod connectivity;
pub mod manager;
pub mod report;

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
mod integration_tests;

pub use api::{ApiError, ApiResult, HttpApi, RemoteApi};
pub use classify::{classify, ErrorClass};
pub use connectivity::{ConnectivityMonitor, ConnectivityProvider};
pub use manager::{SyncConfig, SyncError, SyncManager};
pub use report::{DrainReport, SyncEvent};
