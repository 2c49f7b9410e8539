// ABOUTME: Token verification delegated to the hosted identity service's user endpoint
// ABOUTME: Rejected tokens become Unauthorized; transport and server errors become UpstreamFailure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{require_token, IdentityVerifier, VerifiedIdentity, INVALID_TOKEN};
use crate::errors::{AppError, AppResult};

const SERVICE_NAME: &str = "Identity service";
const USER_ENDPOINT: &str = "auth/v1/user";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct IdentityUser {
    id: Option<String>,
}

/// Calls `GET {base_url}/auth/v1/user` with the caller's token
pub struct RemoteIdentityVerifier {
    client: Client,
    user_url: String,
    api_key: Option<String>,
}

impl RemoteIdentityVerifier {
    /// Create a verifier for the identity service at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(base_url: &str, api_key: Option<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            user_url: format!("{}/{USER_ENDPOINT}", base_url.trim_end_matches('/')),
            api_key,
        })
    }
}

#[async_trait]
impl IdentityVerifier for RemoteIdentityVerifier {
    fn name(&self) -> &'static str {
        "remote"
    }

    #[instrument(skip_all, fields(url = %self.user_url))]
    async fn verify(&self, token: Option<&str>) -> AppResult<VerifiedIdentity> {
        let token = require_token(token)?;

        let mut request = self.client.get(&self.user_url).bearer_auth(token);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::upstream(SERVICE_NAME, format!("request failed: {e}")))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!(%status, "Identity service rejected token");
                return Err(AppError::unauthorized(INVALID_TOKEN));
            }
            s if !s.is_success() => {
                warn!(%status, "Identity service returned an error");
                return Err(AppError::upstream(
                    SERVICE_NAME,
                    format!("unexpected status {status}"),
                ));
            }
            _ => {}
        }

        let user: IdentityUser = response.json().await.map_err(|e| {
            AppError::upstream(SERVICE_NAME, format!("invalid user response: {e}"))
        })?;

        user.id
            .filter(|id| !id.is_empty())
            .map(|user_id| VerifiedIdentity { user_id })
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))
    }
}
