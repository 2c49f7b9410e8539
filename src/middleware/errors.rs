// ABOUTME: Rewrites plain-text rejections from tower layers into the JSON error body
// ABOUTME: Covers the body-size limit and the whole-request timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use crate::errors::{ErrorCode, ErrorResponse};

/// Give 408 and 413 responses the same `{error, code}` body as every other failure
///
/// The status code is kept; only the body changes.
pub async fn json_error_bodies(response: Response) -> Response {
    let (error, code) = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ("Request body too large", ErrorCode::BadRequest),
        StatusCode::REQUEST_TIMEOUT => ("Request timed out", ErrorCode::UpstreamFailure),
        _ => return response,
    };
    warn!(status = %response.status(), "Request rejected by server limits");

    let body = ErrorResponse {
        error: error.to_owned(),
        code,
    };
    (response.status(), Json(body)).into_response()
}
