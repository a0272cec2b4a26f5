// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn status(code: u16) -> ApiError {
    ApiError::Status { code, retry_after: None }
}

#[parameterized(
    timeout = { ApiError::Timeout },
    connect = { ApiError::Connect("connection refused".into()) },
    request_timeout = { status(408) },
    rate_limited = { status(429) },
    internal = { status(500) },
    bad_gateway = { status(502) },
    unavailable = { status(503) },
)]
fn transient_errors(err: ApiError) {
    assert_eq!(classify(&err), ErrorClass::Transient);
}

#[parameterized(
    bad_request = { status(400) },
    unauthorized = { status(401) },
    forbidden = { status(403) },
    not_found = { status(404) },
    conflict = { status(409) },
    unprocessable = { status(422) },
    invalid_body = { ApiError::InvalidResponse("missing id".into()) },
)]
fn permanent_errors(err: ApiError) {
    assert_eq!(classify(&err), ErrorClass::Permanent);
}

#[test]
fn rate_limit_with_hint_is_still_transient() {
    let err = ApiError::Status { code: 429, retry_after: Some(30) };
    assert_eq!(classify(&err), ErrorClass::Transient);
}
