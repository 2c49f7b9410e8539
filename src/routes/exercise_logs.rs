// ABOUTME: Exercise log write path feeding the exertion history used by plan generation
// ABOUTME: Validates sets and RPE range before appending one row
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
use chrono::{NaiveDate, Utc};
use pierre_coach_core::models::LoggedSet;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::request::UserRequest;
use crate::database::NewExerciseLog;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Lowest accepted RPE
pub const MIN_RPE: f64 = 1.0;

/// Highest accepted RPE
pub const MAX_RPE: f64 = 10.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogExerciseBody {
    exercise_name: String,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    sets: Vec<LoggedSet>,
    #[serde(default)]
    workout_session_id: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl LogExerciseBody {
    fn into_entry(self, user_id: String, today: NaiveDate) -> AppResult<NewExerciseLog> {
        let exercise_name = self.exercise_name.trim().to_owned();
        if exercise_name.is_empty() {
            return Err(AppError::bad_request("exerciseName is required"));
        }
        if self.sets.is_empty() {
            return Err(AppError::bad_request("At least one set is required"));
        }
        if let Some(rpe) = self
            .sets
            .iter()
            .filter_map(|set| set.rpe)
            .find(|rpe| !(MIN_RPE..=MAX_RPE).contains(rpe))
        {
            return Err(AppError::bad_request(format!(
                "RPE must be between {MIN_RPE} and {MAX_RPE}, got {rpe}"
            )));
        }

        Ok(NewExerciseLog {
            user_id,
            workout_session_id: self.workout_session_id.filter(|id| !id.is_empty()),
            exercise_name,
            sets: self.sets,
            date: self.date.unwrap_or(today),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Exercise log routes
pub struct ExerciseLogRoutes;

impl ExerciseLogRoutes {
    /// Create all exercise log routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/exercise_logs", post(Self::handle_create))
            .with_state(resources)
    }

    /// Handle POST /exercise_logs
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let request = UserRequest::parse(&body)?
            .authorize(resources.identity.as_ref(), &headers)
            .await?;
        let user_id = request.user_id.clone();
        let entry = request
            .params::<LogExerciseBody>()?
            .into_entry(user_id, Utc::now().date_naive())?;

        let id = resources.database.insert_exercise_log(&entry).await?;
        info!(log_id = %id, exercise = %entry.exercise_name, sets = entry.sets.len(), "Exercise logged");

        Ok((StatusCode::OK, Json(json!({ "id": id }))).into_response())
    }
}
