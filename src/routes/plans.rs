// ABOUTME: Workout plan generation routes for single sessions and week/month periods
// ABOUTME: Validates the body, authorizes the caller, then hands off to the plan pipeline
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
use crate::errors::{AppError, AppResult};
use crate::plans::{PlanService, WorkoutRequest};
use crate::resources::ServerResources;

/// Longest session the generator is asked for
pub const MAX_DURATION_MIN: f64 = 600.0;

#[derive(Debug, Deserialize)]
struct GenerateWorkoutBody {
    #[serde(default)]
    muscles: Vec<String>,
    #[serde(default)]
    style: String,
    duration: f64,
    #[serde(default)]
    goal: String,
}

impl GenerateWorkoutBody {
    fn into_request(self) -> AppResult<WorkoutRequest> {
        if !self.duration.is_finite() || self.duration < 1.0 || self.duration > MAX_DURATION_MIN {
            return Err(AppError::bad_request(format!(
                "duration must be between 1 and {MAX_DURATION_MIN} minutes"
            )));
        }
        let request = WorkoutRequest::new(
            self.muscles,
            &self.style,
            self.duration.round() as u32,
            &self.goal,
        );
        if request.muscles.is_empty() {
            return Err(AppError::bad_request("muscles must list at least one muscle group"));
        }
        if request.style.is_empty() {
            return Err(AppError::bad_request("style is required"));
        }
        if request.goal.is_empty() {
            return Err(AppError::bad_request("goal is required"));
        }
        Ok(request)
    }
}

#[derive(Debug, Deserialize)]
struct PlanPeriodBody {
    period: String,
}

/// Plan generation routes
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/generateWorkoutPlan", post(Self::handle_generate_workout))
            .route("/planPeriod", post(Self::handle_plan_period))
            .with_state(resources)
    }

    /// Handle POST /generateWorkoutPlan
    async fn handle_generate_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let request = UserRequest::parse(&body)?
            .authorize(resources.identity.as_ref(), &headers)
            .await?;
        let user_id = request.user_id.clone();
        let workout = request.params::<GenerateWorkoutBody>()?.into_request()?;

        let generated = PlanService::from_resources(&resources)
            .generate_workout(&user_id, workout, Utc::now().date_naive())
            .await?;

        Ok((StatusCode::OK, Json(generated)).into_response())
    }

    /// Handle POST /planPeriod
    async fn handle_plan_period(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let request = UserRequest::parse(&body)?
            .authorize(resources.identity.as_ref(), &headers)
            .await?;
        let user_id = request.user_id.clone();
        let params: PlanPeriodBody = request.params()?;

        let plan = PlanService::from_resources(&resources)
            .plan_period(&user_id, &params.period, Utc::now().date_naive())
            .await?;

        Ok((StatusCode::OK, Json(plan)).into_response())
    }
}
