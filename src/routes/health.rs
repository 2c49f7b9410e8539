// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Liveness reports the process is up; readiness also checks the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tracing::warn;

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/ready", get(Self::ready_handler))
            .with_state(resources)
    }

    async fn health_handler() -> Json<serde_json::Value> {
        Json(json!({
            "status": "healthy",
            "service": crate::logging::SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn ready_handler(State(resources): State<Arc<ServerResources>>) -> impl IntoResponse {
        let database_ok = sqlx::query("SELECT 1")
            .execute(resources.database.pool())
            .await
            .inspect_err(|e| warn!(error = %e, "Readiness check failed"))
            .is_ok();

        let status = if database_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (
            status,
            Json(json!({
                "status": if database_ok { "ready" } else { "unavailable" },
                "database": database_ok,
                "generation": resources.generation.name(),
                "identity": resources.identity.name(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        )
    }
}
