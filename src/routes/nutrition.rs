// ABOUTME: Nutrition routes for intake analysis and food transcript classification
// ABOUTME: Same body, userId and ownership checks as the plan routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use super::request::UserRequest;
use crate::errors::AppError;
use crate::nutrition::{analyze_nutrition, classify_and_log};
use crate::plans::PlanService;
use crate::resources::ServerResources;

#[derive(Debug, Deserialize)]
struct ClassifyBody {
    #[serde(default)]
    transcript: String,
}

/// Nutrition routes
pub struct NutritionRoutes;

impl NutritionRoutes {
    /// Create all nutrition routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/analyze_nutrition", post(Self::handle_analyze))
            .route("/classify_food_recordings", post(Self::handle_classify))
            .with_state(resources)
    }

    /// Handle POST /analyze_nutrition
    async fn handle_analyze(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let request = UserRequest::parse(&body)?
            .authorize(resources.identity.as_ref(), &headers)
            .await?;

        let analysis =
            analyze_nutrition(&resources.database, &request.user_id, Utc::now().date_naive())
                .await?;

        Ok((StatusCode::OK, Json(analysis)).into_response())
    }

    /// Handle POST /classify_food_recordings
    async fn handle_classify(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let request = UserRequest::parse(&body)?;
        let user_id = request.user_id.clone();
        let params: ClassifyBody = request.params()?;
        let transcript = params.transcript.trim();
        if transcript.is_empty() {
            return Err(AppError::bad_request("userId and transcript are required"));
        }
        crate::middleware::authorize_user(resources.identity.as_ref(), &headers, &user_id).await?;

        let result = classify_and_log(
            &PlanService::from_resources(&resources),
            &user_id,
            transcript,
            Utc::now().date_naive(),
        )
        .await?;

        Ok((StatusCode::OK, Json(result)).into_response())
    }
}
