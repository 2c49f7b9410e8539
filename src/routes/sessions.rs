// ABOUTME: Workout session retrieval for the caller's own sessions
// ABOUTME: Sessions owned by other users are reported as not found
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::errors::AppError;
use crate::middleware::authenticate;
use crate::resources::ServerResources;

/// Workout session routes
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create all session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/workout_sessions/:id", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle GET /workout_sessions/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let identity = authenticate(resources.identity.as_ref(), &headers).await?;
        let session = resources
            .database
            .get_workout_session(&id, &identity.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout session"))?;

        Ok((StatusCode::OK, Json(session)).into_response())
    }
}
