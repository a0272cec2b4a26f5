// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end tests across the store, connectivity, and the manager.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use carelog_core::{EntityKind, Store, SyncState};
use serde_json::json;

use crate::connectivity::ConnectivityMonitor;
use crate::manager::{SyncConfig, SyncManager};
use crate::test_helpers::{test_store, timeout_error, ApiCall, MockApi};

fn make_session(
    store: &Arc<Mutex<Store>>,
    online: bool,
    user_id: &str,
) -> (MockApi, Arc<ConnectivityMonitor>, SyncManager<MockApi>) {
    let api = MockApi::new();
    let monitor = Arc::new(ConnectivityMonitor::new(online));
    let manager = SyncManager::new(
        Arc::clone(store),
        api.clone(),
        monitor.clone(),
        SyncConfig::default(),
        user_id,
    );
    (api, monitor, manager)
}

#[tokio::test]
async fn offline_write_syncs_after_reconnect() {
    let store = test_store();
    let (api, monitor, manager) = make_session(&store, false, "u1");

    // Record a measurement while offline
    let (local_id, _) = store
        .lock()
        .unwrap()
        .create_entity(EntityKind::Measurement, "u1", &json!({"systolic": 120}))
        .unwrap();
    assert!(manager.sync_now().await.unwrap().is_none());
    assert!(api.calls().is_empty());

    // Reconnect and drain
    monitor.set_online(true);
    let report = manager.sync_now().await.unwrap().unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(api.calls().len(), 1);
    assert!(matches!(api.calls()[0], ApiCall::Create { kind: EntityKind::Measurement, .. }));

    let store = store.lock().unwrap();
    let record = store.record(EntityKind::Measurement, local_id).unwrap();
    assert_eq!(record.sync_state, SyncState::Synced);
    assert!(record.server_id.is_some());
    assert_eq!(store.pending_count("u1").unwrap(), 0);
}

#[tokio::test]
async fn queue_drains_in_creation_order_across_kinds() {
    let store = test_store();
    let (api, _monitor, manager) = make_session(&store, true, "u1");

    {
        let store = store.lock().unwrap();
        store.create_entity(EntityKind::Measurement, "u1", &json!({"systolic": 118})).unwrap();
        store.create_entity(EntityKind::Adherence, "u1", &json!({"taken": true})).unwrap();
        store.create_entity(EntityKind::Visit, "u1", &json!({"site": "clinic-a"})).unwrap();
    }

    manager.sync_now().await.unwrap().unwrap();

    let kinds: Vec<EntityKind> = api
        .calls()
        .iter()
        .map(|call| match call {
            ApiCall::Create { kind, .. } => *kind,
            other => unreachable!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![EntityKind::Measurement, EntityKind::Adherence, EntityKind::Visit]
    );
}

#[tokio::test]
async fn delivery_is_at_least_once_despite_failures() {
    let store = test_store();
    let (api, _monitor, manager) = make_session(&store, true, "u1");

    let (local_id, _) = store
        .lock()
        .unwrap()
        .create_entity(EntityKind::Prescription, "u1", &json!({"drug": "metformin"}))
        .unwrap();
    // Three transient failures, below the cap of five
    api.fail_times(3, timeout_error);

    for _ in 0..3 {
        let report = manager.sync_now().await.unwrap().unwrap();
        assert_eq!(report.failed, 1);
    }
    let report = manager.sync_now().await.unwrap().unwrap();
    assert_eq!(report.delivered, 1);

    let store = store.lock().unwrap();
    let record = store.record(EntityKind::Prescription, local_id).unwrap();
    assert_eq!(record.sync_state, SyncState::Synced);
    assert!(record.server_id.is_some());
    assert_eq!(store.pending_count("u1").unwrap(), 0);
    assert_eq!(store.failed_count("u1").unwrap(), 0);
}

#[tokio::test]
async fn create_then_edit_then_delete_reconciles_throughout() {
    let store = test_store();
    let (api, _monitor, manager) = make_session(&store, true, "u1");

    let local_id = {
        let store = store.lock().unwrap();
        let (local_id, _) = store
            .create_entity(EntityKind::Medication, "u1", &json!({"name": "amlodipine"}))
            .unwrap();
        store
            .update_entity(EntityKind::Medication, local_id, &json!({"name": "amlodipine", "dose_mg": 10}))
            .unwrap();
        local_id
    };
    manager.sync_now().await.unwrap().unwrap();

    store.lock().unwrap().delete_entity(EntityKind::Medication, local_id).unwrap();
    manager.sync_now().await.unwrap().unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(calls[0], ApiCall::Create { .. }));
    assert_eq!(
        calls[1],
        ApiCall::Update {
            kind: EntityKind::Medication,
            server_id: "srv-1".into(),
            payload: json!({"name": "amlodipine", "dose_mg": 10}),
        }
    );
    assert_eq!(
        calls[2],
        ApiCall::Delete { kind: EntityKind::Medication, server_id: "srv-1".into() }
    );
    assert_eq!(store.lock().unwrap().pending_count("u1").unwrap(), 0);
}

#[tokio::test]
async fn queue_survives_restart_and_then_drains() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("carelog.db");

    // First session: record offline, never sync
    {
        let store = Store::open(&path).unwrap();
        store
            .create_entity(EntityKind::Measurement, "u1", &json!({"systolic": 120}))
            .unwrap();
    }

    // Second session: the queued mutation is still there and drains
    let store = Arc::new(Mutex::new(Store::open(&path).unwrap()));
    let (api, _monitor, manager) = make_session(&store, true, "u1");
    assert_eq!(store.lock().unwrap().pending_count("u1").unwrap(), 1);

    let report = manager.sync_now().await.unwrap().unwrap();
    assert_eq!(report.delivered, 1);
    assert_eq!(api.calls().len(), 1);
    assert_eq!(store.lock().unwrap().pending_count("u1").unwrap(), 0);
}

#[tokio::test]
async fn user_queues_are_independent() {
    let store = test_store();
    let (api1, _m1, manager1) = make_session(&store, true, "u1");
    let (api2, _m2, manager2) = make_session(&store, true, "u2");

    {
        let store = store.lock().unwrap();
        store.create_entity(EntityKind::Measurement, "u1", &json!({"systolic": 120})).unwrap();
        store.create_entity(EntityKind::Measurement, "u2", &json!({"systolic": 140})).unwrap();
    }

    let report = manager1.sync_now().await.unwrap().unwrap();
    assert_eq!(report.delivered, 1);
    assert_eq!(api1.calls().len(), 1);
    assert!(api2.calls().is_empty());

    // u2's item is untouched until its own manager drains
    assert_eq!(store.lock().unwrap().pending_count("u2").unwrap(), 1);
    manager2.sync_now().await.unwrap().unwrap();
    assert_eq!(store.lock().unwrap().pending_count("u2").unwrap(), 0);
}
