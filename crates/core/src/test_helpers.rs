// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for carelog-core tests.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Mutex;

use crate::clock::ClockSource;

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

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for TestClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().unwrap();
        let now = *current;
        *current += Duration::seconds(1);
        now
    }
}
