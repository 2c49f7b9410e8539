// ABOUTME: Request body handling shared by the user-scoped POST endpoints
// ABOUTME: Parses raw JSON, extracts userId ahead of authentication and decodes typed parameters after it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::identity::IdentityVerifier;
use crate::middleware::authorize_user;

/// JSON body whose `userId` has been extracted but not yet authorized
#[derive(Debug)]
pub struct UserRequest {
    /// Claimed user id
    pub user_id: String,
    body: Value,
}

impl UserRequest {
    /// Parse a raw body and pull out `userId`
    ///
    /// # Errors
    ///
    /// `BadRequest` for an empty or malformed body, or a missing `userId`
    pub fn parse(bytes: &Bytes) -> AppResult<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::bad_request("Request body is required"));
        }
        let body: Value = serde_json::from_slice(bytes)
            .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {e}")))?;
        if !body.is_object() {
            return Err(AppError::bad_request("Invalid JSON body: expected an object"));
        }

        let user_id = body
            .get("userId")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::bad_request("userId is required"))?
            .to_owned();

        Ok(Self { user_id, body })
    }

    /// Verify the bearer token belongs to `userId`
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `Forbidden` or `UpstreamFailure` from the identity check
    pub async fn authorize(
        self,
        verifier: &dyn IdentityVerifier,
        headers: &HeaderMap,
    ) -> AppResult<Self> {
        authorize_user(verifier, headers, &self.user_id).await?;
        Ok(self)
    }

    /// Decode the endpoint's parameters
    ///
    /// # Errors
    ///
    /// `BadRequest` when the body does not match `T`
    pub fn params<T: DeserializeOwned>(self) -> AppResult<T> {
        serde_json::from_value(self.body)
            .map_err(|e| AppError::bad_request(format!("Invalid request parameters: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use serde::Deserialize;

    #[test]
    fn test_empty_body_rejected() {
        let err = UserRequest::parse(&Bytes::from_static(b"  ")).unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[test]
    fn test_malformed_body_rejected() {
        let err = UserRequest::parse(&Bytes::from_static(b"{\"userId\":")).unwrap_err();
        assert!(err.message.starts_with("Invalid JSON body"));
    }

    #[test]
    fn test_missing_user_id_rejected() {
        let err = UserRequest::parse(&Bytes::from_static(b"{\"period\":\"week\"}")).unwrap_err();
        assert_eq!(err.message, "userId is required");
        let err = UserRequest::parse(&Bytes::from_static(b"{\"userId\":\"\"}")).unwrap_err();
        assert_eq!(err.message, "userId is required");
    }

    #[test]
    fn test_params_decoded() {
        #[derive(Deserialize)]
        struct Params {
            period: String,
        }
        let request =
            UserRequest::parse(&Bytes::from_static(b"{\"userId\":\"u1\",\"period\":\"week\"}"))
                .unwrap();
        assert_eq!(request.user_id, "u1");
        assert_eq!(request.params::<Params>().unwrap().period, "week");
    }
}
