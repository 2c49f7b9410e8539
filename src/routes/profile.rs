// ABOUTME: Profile accessor routes for the authenticated caller
// ABOUTME: GET creates an empty profile on first access; PUT validates enumerated fields and upserts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use pierre_coach_core::models::{
    ActivityLevel, FitnessLevel, Gender, HeightUnit, UserProfile, WeightUnit,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::middleware::authenticate;
use crate::resources::ServerResources;

/// Oldest age accepted on a profile
pub const MAX_AGE: u32 = 120;

/// Editable profile fields; absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdate {
    username: Option<String>,
    age: Option<u32>,
    gender: Option<String>,
    height: Option<f64>,
    height_unit: Option<String>,
    weight: Option<f64>,
    weight_unit: Option<String>,
    activity_level: Option<String>,
    fitness_level: Option<String>,
    goal: Option<String>,
}

fn parse_field<T>(
    field: &str,
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> AppResult<Option<T>> {
    value
        .map(|raw| {
            parse(raw).ok_or_else(|| AppError::bad_request(format!("Invalid {field}: {raw}")))
        })
        .transpose()
}

fn positive(field: &str, value: Option<f64>) -> AppResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => {
            Err(AppError::bad_request(format!("{field} must be a positive number")))
        }
        other => Ok(other),
    }
}

impl ProfileUpdate {
    /// Apply validated fields onto `profile`
    fn apply(self, profile: &mut UserProfile) -> AppResult<()> {
        if let Some(age) = self.age {
            if age == 0 || age > MAX_AGE {
                return Err(AppError::bad_request(format!(
                    "age must be between 1 and {MAX_AGE}"
                )));
            }
            profile.age = Some(age);
        }
        if let Some(gender) = parse_field("gender", self.gender.as_deref(), Gender::parse)? {
            profile.gender = Some(gender);
        }
        if let Some(height) = positive("height", self.height)? {
            profile.height = Some(height);
        }
        if let Some(unit) =
            parse_field("heightUnit", self.height_unit.as_deref(), HeightUnit::parse)?
        {
            profile.height_unit = unit;
        }
        if let Some(weight) = positive("weight", self.weight)? {
            profile.weight = Some(weight);
        }
        if let Some(unit) =
            parse_field("weightUnit", self.weight_unit.as_deref(), WeightUnit::parse)?
        {
            profile.weight_unit = unit;
        }
        if let Some(level) =
            parse_field("activityLevel", self.activity_level.as_deref(), ActivityLevel::parse)?
        {
            profile.activity_level = Some(level);
        }
        if let Some(level) =
            parse_field("fitnessLevel", self.fitness_level.as_deref(), FitnessLevel::parse)?
        {
            profile.fitness_level = Some(level);
        }
        if let Some(username) = self.username {
            profile.username = Some(username.trim().to_owned()).filter(|u| !u.is_empty());
        }
        if let Some(goal) = self.goal {
            profile.goal = Some(goal.trim().to_lowercase()).filter(|g| !g.is_empty());
        }
        Ok(())
    }
}

/// Profile routes
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/profile", get(Self::handle_get).put(Self::handle_put))
            .with_state(resources)
    }

    /// Handle GET /profile
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let identity = authenticate(resources.identity.as_ref(), &headers).await?;
        let profile = resources
            .database
            .get_or_create_profile(&identity.user_id)
            .await?;
        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Handle PUT /profile
    async fn handle_put(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let identity = authenticate(resources.identity.as_ref(), &headers).await?;
        let update: ProfileUpdate = serde_json::from_slice(&body)
            .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {e}")))?;

        let mut profile = resources
            .database
            .get_or_create_profile(&identity.user_id)
            .await?;
        update.apply(&mut profile)?;
        let saved = resources.database.save_profile(&profile).await?;

        info!(user_id = %identity.user_id, "Profile saved");
        Ok((StatusCode::OK, Json(saved)).into_response())
    }
}
