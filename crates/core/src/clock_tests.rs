// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::test_helpers::TestClock;

#[test]
fn system_clock_is_roughly_now() {
    let clock = SystemClock;
    let before = Utc::now();
    let now = clock.now();
    let after = Utc::now();
    assert!(now >= before && now <= after);
}

#[test]
fn clock_source_ref_impl() {
    let clock = TestClock::new();
    let by_ref: &TestClock = &clock;
    let first = by_ref.now();
    let second = by_ref.now();
    assert!(second > first);
}

#[test]
fn test_clock_advances_per_call() {
    let clock = TestClock::new();
    let a = clock.now();
    let b = clock.now();
    let c = clock.now();
    assert_eq!(b - a, chrono::Duration::seconds(1));
    assert_eq!(c - b, chrono::Duration::seconds(1));
}
