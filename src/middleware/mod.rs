// ABOUTME: HTTP middleware for authentication, CORS, error bodies and request tracing
// ABOUTME: Shared by every route module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Bearer authentication and ownership checks
pub mod auth;
/// CORS configuration
pub mod cors;
/// JSON bodies for layer rejections
pub mod errors;
/// Request spans
pub mod tracing;

pub use auth::{authenticate, authorize_user, bearer_token};
pub use cors::setup_cors;
pub use errors::json_error_bodies;
pub use tracing::create_request_span;
