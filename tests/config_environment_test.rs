// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Environment variables are process-global, so these tests run serially
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::time::Duration;

use pierre_coach::config::{DatabaseUrl, IdentityMode, ServerConfig};
use serial_test::serial;

const VARS: &[&str] = &[
    "HTTP_PORT",
    "ENVIRONMENT",
    "DATABASE_URL",
    "CORS_ALLOWED_ORIGINS",
    "IDENTITY_MODE",
    "IDENTITY_JWT_SECRET",
    "IDENTITY_JWT_AUDIENCE",
    "IDENTITY_SERVICE_URL",
    "IDENTITY_SERVICE_API_KEY",
    "GENERATION_TIMEOUT_SECS",
    "HISTORY_LOOKBACK_DAYS",
    "HISTORY_LIMIT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_jwt_mode_requires_secret() {
    clear_env();
    let err = ServerConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("IDENTITY_JWT_SECRET"));
}

#[test]
#[serial]
fn test_defaults_with_secret() {
    clear_env();
    env::set_var("IDENTITY_JWT_SECRET", "secret");

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.identity.mode, IdentityMode::Jwt);
    assert_eq!(config.identity.jwt_audience, "authenticated");
    assert_eq!(config.generation.timeout, Duration::from_secs(30));
    assert_eq!(config.history.lookback_days, 56);
    assert_eq!(config.history.limit, 30);
    clear_env();
}

#[test]
#[serial]
fn test_overrides_are_read() {
    clear_env();
    env::set_var("IDENTITY_MODE", "remote");
    env::set_var("IDENTITY_SERVICE_URL", "https://id.example.com");
    env::set_var("HTTP_PORT", "9090");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("GENERATION_TIMEOUT_SECS", "12");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://a.example.com, https://b.example.com");

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, 9090);
    assert_eq!(config.database_url, DatabaseUrl::Memory);
    assert_eq!(config.identity.mode, IdentityMode::Remote);
    assert_eq!(config.generation.timeout, Duration::from_secs(12));
    assert_eq!(config.cors_origins.len(), 2);
    clear_env();
}

#[test]
#[serial]
fn test_invalid_number_is_rejected() {
    clear_env();
    env::set_var("IDENTITY_JWT_SECRET", "secret");
    env::set_var("HISTORY_LIMIT", "lots");

    let err = ServerConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("HISTORY_LIMIT"));
    clear_env();
}

#[test]
#[serial]
fn test_zero_timeout_is_rejected() {
    clear_env();
    env::set_var("IDENTITY_JWT_SECRET", "secret");
    env::set_var("GENERATION_TIMEOUT_SECS", "0");

    assert!(ServerConfig::from_env().is_err());
    clear_env();
}

#[cfg(not(feature = "dev-identity"))]
#[test]
#[serial]
fn test_stub_mode_needs_feature() {
    clear_env();
    env::set_var("IDENTITY_MODE", "stub");

    let err = ServerConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("dev-identity"));
    clear_env();
}

#[test]
fn test_database_url_parsing() {
    assert_eq!(DatabaseUrl::parse_url("sqlite::memory:"), DatabaseUrl::Memory);
    assert_eq!(
        DatabaseUrl::parse_url("sqlite:./data/coach.db").to_connection_string(),
        "sqlite:./data/coach.db"
    );
}
