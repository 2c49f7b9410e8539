// ABOUTME: Profile store accessor with insert-if-absent reads and explicit saves
// ABOUTME: Maps profile rows to UserProfile, parsing enum columns from their string form
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use pierre_coach_core::models::{
    ActivityLevel, FitnessLevel, Gender, HeightUnit, UserProfile, WeightUnit,
};
use sqlx::{sqlite::SqliteRow, Row};
use tracing::debug;

use super::Database;
use crate::errors::{AppError, AppResult};

impl Database {
    /// Fetch a profile without creating it
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query("SELECT * FROM profile WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::persistence(format!("Failed to fetch profile: {e}")))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    /// Fetch a profile, inserting an empty one first when the user has none
    ///
    /// # Errors
    ///
    /// Returns an error if the insert or query fails
    pub async fn get_or_create_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        let now = Utc::now();
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO profile (user_id, created_at, updated_at) VALUES ($1, $2, $2)",
        )
        .bind(user_id)
        .bind(now)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::persistence(format!("Failed to create profile: {e}")))?;

        if inserted.rows_affected() > 0 {
            debug!(user_id = %user_id, "Created empty profile on first access");
        }

        self.get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::persistence("Profile missing after insert"))
    }

    /// Insert or replace every editable field of a profile
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails
    pub async fn save_profile(&self, profile: &UserProfile) -> AppResult<UserProfile> {
        let now = Utc::now();
        sqlx::query(
            r"
            INSERT INTO profile (
                user_id, username, age, gender, height, height_unit, weight, weight_unit,
                activity_level, fitness_level, goal, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                age = excluded.age,
                gender = excluded.gender,
                height = excluded.height,
                height_unit = excluded.height_unit,
                weight = excluded.weight,
                weight_unit = excluded.weight_unit,
                activity_level = excluded.activity_level,
                fitness_level = excluded.fitness_level,
                goal = excluded.goal,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&profile.user_id)
        .bind(&profile.username)
        .bind(profile.age.map(i64::from))
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(profile.height)
        .bind(profile.height_unit.as_str())
        .bind(profile.weight)
        .bind(profile.weight_unit.as_str())
        .bind(profile.activity_level.map(|a| a.as_str()))
        .bind(profile.fitness_level.map(|f| f.as_str()))
        .bind(&profile.goal)
        .bind(now)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::persistence(format!("Failed to save profile: {e}")))?;

        self.get_profile(&profile.user_id)
            .await?
            .ok_or_else(|| AppError::persistence("Profile missing after save"))
    }
}

fn row_to_profile(row: &SqliteRow) -> AppResult<UserProfile> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    let age: Option<i64> = row.try_get("age")?;
    let gender: Option<String> = row.try_get("gender")?;
    let height_unit: String = row.try_get("height_unit")?;
    let weight_unit: String = row.try_get("weight_unit")?;
    let activity_level: Option<String> = row.try_get("activity_level")?;
    let fitness_level: Option<String> = row.try_get("fitness_level")?;

    Ok(UserProfile {
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        age: age.and_then(|a| u32::try_from(a).ok()),
        gender: gender.as_deref().and_then(Gender::parse),
        height: row.try_get("height")?,
        height_unit: HeightUnit::parse(&height_unit).unwrap_or_default(),
        weight: row.try_get("weight")?,
        weight_unit: WeightUnit::parse(&weight_unit).unwrap_or_default(),
        activity_level: activity_level.as_deref().and_then(ActivityLevel::parse),
        fitness_level: fitness_level.as_deref().and_then(FitnessLevel::parse),
        goal: row.try_get("goal")?,
        created_at,
        updated_at,
    })
}
