// ABOUTME: Exercise log persistence: append-only writes and windowed reads
// ABOUTME: Sets are stored as a JSON array so per-set RPE survives round trips
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{NaiveDate, Utc};
use pierre_coach_core::models::{ExerciseLogEntry, LoggedSet};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};

/// Fields of a new exercise log row
#[derive(Debug, Clone)]
pub struct NewExerciseLog {
    /// Owner
    pub user_id: String,
    /// Optional session backlink
    pub workout_session_id: Option<String>,
    /// Exercise name
    pub exercise_name: String,
    /// Performed sets
    pub sets: Vec<LoggedSet>,
    /// Day performed
    pub date: NaiveDate,
    /// Free-form notes
    pub notes: Option<String>,
}

impl Database {
    /// Append one exercise log entry and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails
    pub async fn insert_exercise_log(&self, entry: &NewExerciseLog) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let sets_json = serde_json::to_string(&entry.sets)?;

        sqlx::query(
            r"
            INSERT INTO exercise_log (id, user_id, workout_session_id, exercise_name, sets, date, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&id)
        .bind(&entry.user_id)
        .bind(&entry.workout_session_id)
        .bind(&entry.exercise_name)
        .bind(sets_json)
        .bind(entry.date)
        .bind(&entry.notes)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::persistence(format!("Failed to insert exercise log: {e}")))?;

        Ok(id)
    }

    /// Fetch a user's exercise log entries dated on or after `since`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored set list is corrupt
    pub async fn list_exercise_logs_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> AppResult<Vec<ExerciseLogEntry>> {
        let rows = sqlx::query(
            "SELECT * FROM exercise_log WHERE user_id = $1 AND date >= $2 ORDER BY date DESC, created_at DESC",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::persistence(format!("Failed to fetch exercise logs: {e}")))?;

        rows.iter().map(row_to_exercise_log).collect()
    }
}

fn row_to_exercise_log(row: &SqliteRow) -> AppResult<ExerciseLogEntry> {
    let sets_json: String = row.try_get("sets")?;
    let sets: Vec<LoggedSet> = serde_json::from_str(&sets_json)
        .map_err(|e| AppError::persistence(format!("Corrupt exercise_log.sets: {e}")))?;

    Ok(ExerciseLogEntry {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        workout_session_id: row.try_get("workout_session_id")?,
        exercise_name: row.try_get("exercise_name")?,
        sets,
        date: row.try_get("date")?,
        notes: row.try_get("notes")?,
    })
}
