// ABOUTME: Request authentication and ownership check for user-scoped endpoints
// ABOUTME: Extracts the bearer token, verifies it and requires the subject to match the claimed userId
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::identity::{IdentityVerifier, VerifiedIdentity};

/// Message returned when the token subject differs from the claimed user
pub const USER_MISMATCH: &str = "Unauthorized: User ID mismatch";

/// Bearer token from the `Authorization` header, if any
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify the caller and return their identity
///
/// # Errors
///
/// `Unauthorized` when the token is missing or rejected, `UpstreamFailure`
/// when the identity service is unavailable
#[tracing::instrument(skip_all, fields(verifier = verifier.name(), user_id = tracing::field::Empty))]
pub async fn authenticate(
    verifier: &dyn IdentityVerifier,
    headers: &HeaderMap,
) -> AppResult<VerifiedIdentity> {
    let identity = verifier.verify(bearer_token(headers)).await.inspect_err(|e| {
        debug!(error = %e, "Authentication failed");
    })?;
    tracing::Span::current().record("user_id", identity.user_id.as_str());
    Ok(identity)
}

/// Verify the caller and require them to be `claimed_user_id`
///
/// # Errors
///
/// As [`authenticate`], plus `Forbidden` when the subject does not match
pub async fn authorize_user(
    verifier: &dyn IdentityVerifier,
    headers: &HeaderMap,
    claimed_user_id: &str,
) -> AppResult<VerifiedIdentity> {
    let identity = authenticate(verifier, headers).await?;
    if identity.user_id != claimed_user_id {
        warn!(
            subject = %identity.user_id,
            claimed = %claimed_user_id,
            "Token subject does not match requested user"
        );
        return Err(AppError::forbidden(USER_MISMATCH));
    }
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
