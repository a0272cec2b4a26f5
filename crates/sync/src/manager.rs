// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync manager.
//!
//! Drains the mutation queue against the remote service: on startup while
//! online, on every offline-to-online transition, and on a periodic timer
//! while online. One manager is constructed per active session with its
//! dependencies injected (store, remote API, connectivity, clock lives in
//! the store); there is no ambient global state.
//!
//! Deliveries are strictly sequential within a pass to preserve the
//! causal order of local writes and to keep retry accounting simple. A
//! drain trigger that arrives while a pass is running is a no-op; the
//! running pass reschedules the next periodic check itself, so no work is
//! lost.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use carelog_core::{EntityKind, Operation, QueueItem, Store};
use tokio::sync::broadcast;

use crate::api::RemoteApi;
use crate::classify::{classify, ErrorClass};
use crate::connectivity::ConnectivityProvider;
use crate::report::{DrainReport, SyncEvent};

/// Configuration for the sync manager.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Interval between periodic drain checks while online.
    pub poll_interval: Duration,
    /// Capacity of the event channel surfaced to the UI layer.
    pub event_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            poll_interval: Duration::from_secs(60),
            event_capacity: 16,
        }
    }
}

/// Error type for sync manager operations.
///
/// Per-item remote failures never surface here; they are recorded on the
/// queue item and aggregated into the [`DrainReport`]. Only local store
/// failures are fatal to a drain.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The local store failed; the drain was aborted.
    #[error("store error: {0}")]
    Store(#[from] carelog_core::Error),
}

/// Result type for sync manager operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Orchestrates queue drains for one user session.
pub struct SyncManager<A: RemoteApi> {
    store: Arc<Mutex<Store>>,
    api: A,
    connectivity: Arc<dyn ConnectivityProvider>,
    config: SyncConfig,
    user_id: String,
    /// Re-entrancy guard: only one drain runs at a time.
    drain_lock: tokio::sync::Mutex<()>,
    draining: AtomicBool,
    events: broadcast::Sender<SyncEvent>,
}

impl<A: RemoteApi> SyncManager<A> {
    /// Create a manager for one user session with injected dependencies.
    pub fn new(
        store: Arc<Mutex<Store>>,
        api: A,
        connectivity: Arc<dyn ConnectivityProvider>,
        config: SyncConfig,
        user_id: impl Into<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        SyncManager {
            store,
            api,
            connectivity,
            config,
            user_id: user_id.into(),
            drain_lock: tokio::sync::Mutex::new(()),
            draining: AtomicBool::new(false),
            events,
        }
    }

    /// Subscribe to sync events (connectivity transitions, drain reports).
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Returns true while a drain pass is in progress.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run one drain pass now, if possible.
    ///
    /// Returns `Ok(None)` when the drain did not run: offline, or another
    /// pass is already in progress (re-entrant triggers are no-ops).
    pub async fn sync_now(&self) -> SyncResult<Option<DrainReport>> {
        if !self.connectivity.is_online() {
            tracing::debug!("sync requested while offline, skipping");
            return Ok(None);
        }
        let Ok(_guard) = self.drain_lock.try_lock() else {
            tracing::debug!("sync requested while draining, skipping");
            return Ok(None);
        };

        self.draining.store(true, Ordering::SeqCst);
        let result = self.drain().await;
        self.draining.store(false, Ordering::SeqCst);

        let report = result?;
        if !report.is_empty() {
            tracing::info!(
                attempted = report.attempted,
                delivered = report.delivered,
                failed = report.failed,
                exhausted = report.exhausted,
                skipped = report.skipped,
                "drain finished"
            );
        }
        let _ = self.events.send(SyncEvent::DrainCompleted(report.clone()));
        Ok(Some(report))
    }

    /// Manual retry: re-arm all exhausted items for this user, then drain.
    pub async fn retry_failed(&self) -> SyncResult<Option<DrainReport>> {
        let reset = self.store().reset_exhausted(&self.user_id)?;
        if reset > 0 {
            tracing::info!("manual retry of {reset} failed items");
        }
        self.sync_now().await
    }

    /// One pass over the pending queue, oldest first.
    async fn drain(&self) -> SyncResult<DrainReport> {
        let items = self.store().pending_for_user(&self.user_id)?;
        let mut report = DrainReport::default();
        // Server ids assigned by creates earlier in this pass, so queued
        // updates/deletes for the same entity can use them immediately.
        let mut created: HashMap<(EntityKind, i64), String> = HashMap::new();

        for item in items {
            let server_id = match self.resolve_server_id(&item, &created)? {
                Resolved::NotNeeded => None,
                Resolved::Known(id) => Some(id),
                Resolved::Unknown => {
                    // The prerequisite create has not succeeded yet; defer
                    // without consuming a retry.
                    tracing::debug!(
                        "deferring {} {} #{} until its create lands",
                        item.operation,
                        item.kind,
                        item.entity_local_id
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            self.store().begin_attempt(item.id)?;
            report.attempted += 1;

            let outcome = match (item.operation, server_id) {
                (Operation::Create, _) => {
                    self.api.create(item.kind, &item.payload).await.map(Some)
                }
                (Operation::Update, Some(id)) => {
                    self.api.update(item.kind, &id, &item.payload).await.map(|()| None)
                }
                (Operation::Delete, Some(id)) => {
                    self.api.delete(item.kind, &id).await.map(|()| None)
                }
                // resolve_server_id never lets these through
                (Operation::Update | Operation::Delete, None) => continue,
            };

            match outcome {
                Ok(new_server_id) => {
                    self.store().mark_delivered(item.id, new_server_id.as_deref())?;
                    if let Some(id) = new_server_id {
                        created.insert((item.kind, item.entity_local_id), id);
                    }
                    report.delivered += 1;
                }
                Err(e) => {
                    self.record_item_failure(&item, &e, &mut report)?;
                }
            }
        }

        Ok(report)
    }

    /// Record one failed delivery without aborting the batch.
    fn record_item_failure(
        &self,
        item: &QueueItem,
        error: &crate::api::ApiError,
        report: &mut DrainReport,
    ) -> SyncResult<()> {
        report.failed += 1;
        if report.sample_error.is_none() {
            report.sample_error = Some(error.to_string());
        }

        match classify(error) {
            ErrorClass::Transient => {
                self.store().record_failure(item.id, &error.to_string())?;
                if item.attempts + 1 >= item.max_retries {
                    report.exhausted += 1;
                    tracing::warn!(
                        "{} {} #{} exhausted after {} attempts: {error}",
                        item.operation,
                        item.kind,
                        item.entity_local_id,
                        item.attempts + 1
                    );
                } else {
                    tracing::debug!(
                        "{} {} #{} failed (attempt {}): {error}",
                        item.operation,
                        item.kind,
                        item.entity_local_id,
                        item.attempts + 1
                    );
                }
            }
            ErrorClass::Permanent => {
                self.store().mark_exhausted(item.id, &error.to_string())?;
                report.exhausted += 1;
                tracing::warn!(
                    "{} {} #{} failed permanently: {error}",
                    item.operation,
                    item.kind,
                    item.entity_local_id
                );
            }
        }
        Ok(())
    }

    /// Resolve the server id an update/delete must address.
    ///
    /// Order: the id snapshotted at enqueue time, then ids assigned
    /// earlier in this pass, then the entity table.
    fn resolve_server_id(
        &self,
        item: &QueueItem,
        created: &HashMap<(EntityKind, i64), String>,
    ) -> SyncResult<Resolved> {
        if !item.operation.needs_server_id() {
            return Ok(Resolved::NotNeeded);
        }
        if let Some(id) = &item.server_id {
            return Ok(Resolved::Known(id.clone()));
        }
        if let Some(id) = created.get(&(item.kind, item.entity_local_id)) {
            return Ok(Resolved::Known(id.clone()));
        }
        match self.store().server_id(item.kind, item.entity_local_id)? {
            Some(id) => Ok(Resolved::Known(id)),
            None => Ok(Resolved::Unknown),
        }
    }

    /// Drive drains until the connectivity provider goes away.
    ///
    /// Triggers: one immediate pass if online at startup, one per
    /// offline-to-online transition, and the periodic timer while online.
    /// Going offline suppresses scheduling; an in-flight call is left to
    /// fail on its own.
    pub async fn run(&self) {
        let mut online_rx = self.connectivity.subscribe();
        let mut online = self.connectivity.is_online();

        if online {
            self.drain_and_log().await;
        }

        loop {
            tokio::select! {
                changed = online_rx.changed() => {
                    if changed.is_err() {
                        // Provider dropped; nothing will ever wake us again.
                        tracing::debug!("connectivity provider gone, stopping sync loop");
                        return;
                    }
                    let now_online = *online_rx.borrow_and_update();
                    if now_online && !online {
                        online = true;
                        tracing::info!("back online, syncing");
                        let _ = self.events.send(SyncEvent::Online);
                        self.drain_and_log().await;
                    } else if !now_online && online {
                        online = false;
                        tracing::info!("offline, sync paused");
                        let _ = self.events.send(SyncEvent::Offline);
                    }
                }
                _ = tokio::time::sleep(self.config.poll_interval), if online => {
                    self.drain_and_log().await;
                }
            }
        }
    }

    async fn drain_and_log(&self) {
        if let Err(e) = self.sync_now().await {
            tracing::error!("drain aborted: {e}");
        }
    }
}

#[derive(Debug)]
enum Resolved {
    NotNeeded,
    Known(String),
    Unknown,
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
