// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for carelog-sync tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use carelog_core::{ClockSource, EntityKind, Store};
use chrono::{DateTime, TimeZone, Utc};

use crate::api::{ApiError, ApiResult, RemoteApi};

/// Deterministic clock that advances by one second per `now()` call, so
/// consecutive writes get strictly increasing timestamps.
pub struct TestClock {
    current: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn new() -> Self {
        TestClock {
            current: Mutex::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
        }
    }
}

impl ClockSource for TestClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().unwrap();
        let now = *current;
        *current += chrono::Duration::seconds(1);
        now
    }
}

/// In-memory store on a deterministic clock, wrapped for the manager.
pub fn test_store() -> Arc<Mutex<Store>> {
    let store = Store::in_memory_with_clock(Arc::new(TestClock::new())).unwrap();
    Arc::new(Mutex::new(store))
}

/// One call observed by [`MockApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Create {
        kind: EntityKind,
        payload: serde_json::Value,
    },
    Update {
        kind: EntityKind,
        server_id: String,
        payload: serde_json::Value,
    },
    Delete {
        kind: EntityKind,
        server_id: String,
    },
}

/// Mock remote API for testing without real HTTP.
///
/// Calls succeed unless failures have been scripted; scripted failures
/// are consumed in order, one per call. Creates hand out `srv-1`,
/// `srv-2`, ... in call order.
#[derive(Clone)]
pub struct MockApi {
    calls: Arc<Mutex<Vec<ApiCall>>>,
    failures: Arc<Mutex<VecDeque<ApiError>>>,
    next_id: Arc<AtomicU64>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockApi {
    pub fn new() -> Self {
        MockApi {
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Script the next call to fail with the given error.
    pub fn fail_next(&self, err: ApiError) {
        self.failures.lock().unwrap().push_back(err);
    }

    /// Script the next `n` calls to fail.
    pub fn fail_times(&self, n: usize, make: impl Fn() -> ApiError) {
        for _ in 0..n {
            self.fail_next(make());
        }
    }

    /// Make every call sleep first (for re-entrancy tests).
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// All calls observed so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn before_call(&self, call: ApiCall) -> ApiResult<()> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteApi for MockApi {
    fn create(
        &self,
        kind: EntityKind,
        payload: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = ApiResult<String>> + Send + '_>> {
        let payload = payload.clone();
        Box::pin(async move {
            self.before_call(ApiCall::Create { kind, payload }).await?;
            let n = self.next_id.fetch_add(1, Ordering::SeqCst);
            Ok(format!("srv-{n}"))
        })
    }

    fn update(
        &self,
        kind: EntityKind,
        server_id: &str,
        payload: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = ApiResult<()>> + Send + '_>> {
        let server_id = server_id.to_string();
        let payload = payload.clone();
        Box::pin(async move {
            self.before_call(ApiCall::Update { kind, server_id, payload }).await
        })
    }

    fn delete(
        &self,
        kind: EntityKind,
        server_id: &str,
    ) -> Pin<Box<dyn Future<Output = ApiResult<()>> + Send + '_>> {
        let server_id = server_id.to_string();
        Box::pin(async move { self.before_call(ApiCall::Delete { kind, server_id }).await })
    }
}

/// A transient failure as the network would produce it.
pub fn timeout_error() -> ApiError {
    ApiError::Timeout
}

/// A permanent failure as a validating server would produce it.
pub fn unprocessable_error() -> ApiError {
    ApiError::Status { code: 422, retry_after: None }
}
