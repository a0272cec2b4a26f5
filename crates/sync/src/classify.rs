// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote error classification.
//!
//! The drain treats failures differently by class: transient errors
//! consume one retry and wait for a later pass; permanent errors are
//! short-circuited straight to the exhausted state, because a request the
//! server has rejected as invalid will not start succeeding on the sixth
//! attempt. Local store errors are not classified here; they abort the
//! drain and propagate.

use crate::api::ApiError;

/// How the drain should react to a failed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Worth retrying: timeouts, connection failures, 408, 429, 5xx.
    Transient,
    /// Retrying cannot help: other 4xx, unusable response bodies.
    Permanent,
}

/// Classify a remote API error.
pub fn classify(err: &ApiError) -> ErrorClass {
    match err {
        ApiError::Timeout | ApiError::Connect(_) => ErrorClass::Transient,
        ApiError::Status { code, .. } => match code {
            408 | 429 => ErrorClass::Transient,
            code if *code >= 500 => ErrorClass::Transient,
            _ => ErrorClass::Permanent,
        },
        ApiError::InvalidResponse(_) => ErrorClass::Permanent,
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
