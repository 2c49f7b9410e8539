// ABOUTME: Development-only verifier that resolves every request to the preview user
// ABOUTME: Compiled only with the dev-identity feature
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use super::{IdentityVerifier, VerifiedIdentity};
use crate::errors::AppResult;

/// Returns a fixed identity without checking any credential
pub struct StubIdentityVerifier {
    user_id: String,
}

impl StubIdentityVerifier {
    /// Create a stub that always answers `user_id`
    #[must_use]
    pub const fn new(user_id: String) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl IdentityVerifier for StubIdentityVerifier {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn verify(&self, _token: Option<&str>) -> AppResult<VerifiedIdentity> {
        Ok(VerifiedIdentity {
            user_id: self.user_id.clone(),
        })
    }
}
