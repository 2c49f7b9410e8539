// ABOUTME: Unified error handling for the Pierre Coach service
// ABOUTME: ErrorCode taxonomy, AppError with HTTP mapping, and framework conversions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every failure in the plan pipeline is classified into one [`ErrorCode`].
//! Request handlers return [`AppResult`] and the HTTP layer serializes the
//! error as `{"error": <message>, "code": <CODE>}` with the mapped status.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Request validation (1000-1999)
    /// Malformed or missing input
    #[serde(rename = "BAD_REQUEST")]
    BadRequest = 1000,

    // Authentication & Authorization (2000-2999)
    /// No credential, or the credential could not be verified
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized = 2000,
    /// Credential is valid but does not own the resource
    #[serde(rename = "FORBIDDEN")]
    Forbidden = 2001,

    // Resources (3000-3999)
    /// The requested record does not exist for this caller
    #[serde(rename = "NOT_FOUND")]
    NotFound = 3000,

    // External services (5000-5999)
    /// Identity or text-generation service unreachable, erroring or timed out
    #[serde(rename = "UPSTREAM_FAILURE")]
    UpstreamFailure = 5000,
    /// Text-generation service answered but the output did not match the schema
    #[serde(rename = "GENERATION_FAILED")]
    GenerationFailed = 5001,

    // Configuration (6000-6999)
    /// Missing or invalid configuration
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal (9000-9999)
    /// Datastore rejected a read or write
    #[serde(rename = "PERSISTENCE_FAILURE")]
    PersistenceFailure = 9000,
    /// Unclassified failure
    #[serde(rename = "INTERNAL_ERROR")]
    Internal = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::UpstreamFailure
            | Self::GenerationFailed
            | Self::ConfigError
            | Self::PersistenceFailure
            | Self::Internal => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::BadRequest => "The request is malformed or incomplete",
            Self::Unauthorized => "Authentication is required to access this resource",
            Self::Forbidden => "You do not have permission to perform this action",
            Self::NotFound => "The requested resource was not found",
            Self::UpstreamFailure => "An external service failed or did not respond",
            Self::GenerationFailed => "The generated plan did not match the required format",
            Self::ConfigError => "Configuration error encountered",
            Self::PersistenceFailure => "Database operation failed",
            Self::Internal => "An internal server error occurred",
        }
    }

    /// Stable wire name, identical to the serde representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::UpstreamFailure => "UPSTREAM_FAILURE",
            Self::GenerationFailed => "GENERATION_FAILED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::PersistenceFailure => "PERSISTENCE_FAILURE",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message, returned to the caller verbatim
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Malformed or missing request input
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Missing or unverifiable credential
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Authenticated caller does not own the resource
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} not found", resource.into()))
    }

    /// External service error
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UpstreamFailure,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Generated output did not satisfy the output schema
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationFailed, message)
    }

    /// Database error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PersistenceFailure, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error body: `{"error": "...", "code": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Message shown to the caller
    pub error: String,
    /// Machine-readable error class
    pub code: ErrorCode,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: error.message.clone(),
            code: error.code,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {error}")).with_source(error)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::persistence(error.to_string()).with_source(error)
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = %self.code, error = %self, "Request failed");
        } else {
            tracing::debug!(code = %self.code, error = %self, "Request rejected");
        }

        (status, axum::Json(ErrorResponse::from(&self))).into_response()
    }
}
