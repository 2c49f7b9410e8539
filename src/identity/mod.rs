// ABOUTME: Bearer token verification behind an injectable interface
// ABOUTME: Selects the local JWT, remote identity service or development stub verifier at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Identity Verification
//!
//! Request handlers only need `verify(token) -> subject`. The concrete
//! verifier is chosen once from [`IdentityConfig`] when the server starts;
//! nothing downstream inspects hostnames or environment flags.
//!
//! The stub verifier exists only in builds with the `dev-identity` feature,
//! and configuration validation refuses it in production.

mod jwt;
mod remote;
#[cfg(feature = "dev-identity")]
mod stub;

pub use jwt::{IdentityClaims, JwtIdentityVerifier};
pub use remote::RemoteIdentityVerifier;
#[cfg(feature = "dev-identity")]
pub use stub::StubIdentityVerifier;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{IdentityConfig, IdentityMode};
use crate::errors::{AppError, AppResult};

/// Message returned when no bearer token was supplied
pub const AUTH_REQUIRED: &str = "Authentication required";

/// Message returned when a token does not resolve to a user
pub const INVALID_TOKEN: &str = "Invalid token or user not found";

/// Caller identity established from a bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Token subject
    pub user_id: String,
}

/// Resolves a bearer token to the caller's identity
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verifier name for logging
    fn name(&self) -> &'static str;

    /// Verify `token`; `None` means no credential was presented
    ///
    /// # Errors
    ///
    /// `Unauthorized` for missing or rejected tokens, `UpstreamFailure`
    /// when the identity service cannot be reached
    async fn verify(&self, token: Option<&str>) -> AppResult<VerifiedIdentity>;
}

/// Require a token for verifiers that need one
pub(crate) fn require_token(token: Option<&str>) -> AppResult<&str> {
    token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized(AUTH_REQUIRED))
}

/// Build the verifier selected by configuration
///
/// # Errors
///
/// Returns `ConfigError` when the selected mode lacks its settings or is not
/// available in this build
pub fn build_verifier(config: &IdentityConfig) -> AppResult<Arc<dyn IdentityVerifier>> {
    let verifier: Arc<dyn IdentityVerifier> = match config.mode {
        IdentityMode::Jwt => {
            let secret = config
                .jwt_secret
                .as_deref()
                .ok_or_else(|| AppError::config("IDENTITY_JWT_SECRET is required in jwt mode"))?;
            Arc::new(JwtIdentityVerifier::new(secret, &config.jwt_audience))
        }
        IdentityMode::Remote => {
            let url = config
                .service_url
                .as_deref()
                .ok_or_else(|| AppError::config("IDENTITY_SERVICE_URL is required in remote mode"))?;
            Arc::new(RemoteIdentityVerifier::new(
                url,
                config.service_api_key.clone(),
            )?)
        }
        IdentityMode::Stub => build_stub(config)?,
    };

    info!(verifier = verifier.name(), "Identity verifier ready");
    Ok(verifier)
}

#[cfg(feature = "dev-identity")]
fn build_stub(config: &IdentityConfig) -> AppResult<Arc<dyn IdentityVerifier>> {
    tracing::warn!(
        user_id = %config.preview_user_id,
        "Stub identity verifier enabled; every request is treated as the preview user"
    );
    Ok(Arc::new(StubIdentityVerifier::new(
        config.preview_user_id.clone(),
    )))
}

#[cfg(not(feature = "dev-identity"))]
fn build_stub(_config: &IdentityConfig) -> AppResult<Arc<dyn IdentityVerifier>> {
    Err(AppError::config(
        "IDENTITY_MODE=stub requires a build with the dev-identity feature",
    ))
}
