// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn empty_report_is_clean_and_empty() {
    let report = DrainReport::default();
    assert!(report.is_clean());
    assert!(report.is_empty());
}

#[test]
fn report_with_failures_is_not_clean() {
    let report = DrainReport {
        attempted: 3,
        delivered: 2,
        failed: 1,
        exhausted: 0,
        skipped: 0,
        sample_error: Some("request timed out".into()),
    };
    assert!(!report.is_clean());
    assert!(!report.is_empty());
}

#[test]
fn skip_only_pass_is_not_empty() {
    // A pass that deferred work still has something to tell the caller.
    let report = DrainReport { skipped: 1, ..Default::default() };
    assert!(!report.is_empty());
    assert!(report.is_clean());
}
