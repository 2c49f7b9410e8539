// ABOUTME: Local HS256 JWT verification against the identity provider's shared secret
// ABOUTME: Checks signature, expiry and audience, and maps failures to Unauthorized
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{require_token, IdentityVerifier, VerifiedIdentity, INVALID_TOKEN};
use crate::errors::{AppError, AppResult};

/// Claims read from identity provider access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// User id
    pub sub: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience
    #[serde(default)]
    pub aud: Option<String>,
    /// Email, when the provider includes it
    #[serde(default)]
    pub email: Option<String>,
}

/// Verifies HS256 tokens locally
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Create a verifier for tokens signed with `secret` and issued for `audience`
    #[must_use]
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a token
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for expired, malformed or mis-signed tokens
    pub fn decode_claims(&self, token: &str) -> AppResult<IdentityClaims> {
        decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| convert_jwt_error(&e))
    }
}

fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> AppError {
    match e.kind() {
        ErrorKind::ExpiredSignature => {
            debug!("JWT token expired");
            AppError::unauthorized("Token expired")
        }
        ErrorKind::InvalidSignature => {
            warn!("JWT token signature verification failed");
            AppError::unauthorized(INVALID_TOKEN)
        }
        ErrorKind::InvalidAudience => {
            warn!("JWT token issued for a different audience");
            AppError::unauthorized(INVALID_TOKEN)
        }
        _ => {
            warn!(error = %e, "JWT token validation failed");
            AppError::unauthorized(INVALID_TOKEN)
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    fn name(&self) -> &'static str {
        "jwt"
    }

    async fn verify(&self, token: Option<&str>) -> AppResult<VerifiedIdentity> {
        let claims = self.decode_claims(require_token(token)?)?;
        if claims.sub.trim().is_empty() {
            return Err(AppError::unauthorized(INVALID_TOKEN));
        }
        Ok(VerifiedIdentity {
            user_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-with-enough-length-for-hs256";

    fn token(sub: &str, aud: &str, exp_offset: i64, secret: &str) -> String {
        let claims = IdentityClaims {
            sub: sub.to_owned(),
            exp: Utc::now().timestamp() + exp_offset,
            aud: Some(aud.to_owned()),
            email: None,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token() {
        let verifier = JwtIdentityVerifier::new(SECRET, "authenticated");
        let identity = verifier
            .verify(Some(&token("user-1", "authenticated", 3600, SECRET)))
            .await
            .unwrap();
        assert_eq!(identity.user_id, "user-1");
    }

    #[tokio::test]
    async fn test_rejections_are_unauthorized() {
        let verifier = JwtIdentityVerifier::new(SECRET, "authenticated");
        let cases = [
            token("user-1", "authenticated", -3600, SECRET),
            token("user-1", "someone-else", 3600, SECRET),
            token("user-1", "authenticated", 3600, "another-secret-entirely-different"),
            "not-a-jwt".to_owned(),
        ];
        for case in cases {
            let err = verifier.verify(Some(&case)).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::Unauthorized);
        }
    }

    #[tokio::test]
    async fn test_missing_token() {
        let verifier = JwtIdentityVerifier::new(SECRET, "authenticated");
        let err = verifier.verify(None).await.unwrap_err();
        assert_eq!(err.message, "Authentication required");
    }
}
