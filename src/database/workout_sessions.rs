// ABOUTME: Workout session persistence: single inserts, transactional batches and owner-scoped reads
// ABOUTME: The plan payload and muscle list are stored as JSON text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use pierre_coach_core::models::{NewWorkoutSession, ScheduledWorkout, WorkoutPlan, WorkoutSession};
use sqlx::{sqlite::SqliteRow, Row, Sqlite};
use tracing::debug;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};

const INSERT_SESSION_SQL: &str = r"
    INSERT INTO workout_session (
        id, user_id, date, goal, style, duration_min, primary_muscles, ai_plan, planned, created_at
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
";

impl Database {
    /// Insert one session and return its generated id
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the insert is rejected
    pub async fn insert_workout_session(&self, session: &NewWorkoutSession) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        insert_session(self.pool(), &id, session).await?;
        debug!(session_id = %id, user_id = %session.user_id, "Inserted workout session");
        Ok(id)
    }

    /// Insert a batch of sessions atomically: either every row lands or none does
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if any insert or the commit fails
    pub async fn insert_workout_sessions(
        &self,
        sessions: &[NewWorkoutSession],
    ) -> AppResult<Vec<ScheduledWorkout>> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::persistence(format!("Failed to begin transaction: {e}")))?;

        let mut scheduled = Vec::with_capacity(sessions.len());
        for session in sessions {
            let id = Uuid::new_v4().to_string();
            insert_session(&mut *tx, &id, session).await?;
            scheduled.push(ScheduledWorkout {
                id,
                date: session.date,
            });
        }

        tx.commit()
            .await
            .map_err(|e| AppError::persistence(format!("Failed to commit sessions: {e}")))?;

        debug!(count = scheduled.len(), "Inserted workout session batch");
        Ok(scheduled)
    }

    /// Fetch a session by id, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored payload is corrupt
    pub async fn get_workout_session(
        &self,
        id: &str,
        user_id: &str,
    ) -> AppResult<Option<WorkoutSession>> {
        let row = sqlx::query("SELECT * FROM workout_session WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::persistence(format!("Failed to fetch workout session: {e}")))?;

        row.as_ref().map(row_to_session).transpose()
    }

    /// Count a user's sessions
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_workout_sessions(&self, user_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workout_session WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}

async fn insert_session<'e, E>(executor: E, id: &str, session: &NewWorkoutSession) -> AppResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let muscles_json = serde_json::to_string(&session.primary_muscles)?;
    let plan_json = serde_json::to_string(&session.ai_plan)?;

    sqlx::query(INSERT_SESSION_SQL)
        .bind(id)
        .bind(&session.user_id)
        .bind(session.date)
        .bind(&session.goal)
        .bind(&session.style)
        .bind(session.duration_min.map(i64::from))
        .bind(muscles_json)
        .bind(plan_json)
        .bind(session.planned)
        .bind(Utc::now())
        .execute(executor)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to insert workout session: {e}")))?;

    Ok(())
}

fn row_to_session(row: &SqliteRow) -> AppResult<WorkoutSession> {
    let muscles_json: String = row.try_get("primary_muscles")?;
    let plan_json: String = row.try_get("ai_plan")?;
    let duration: Option<i64> = row.try_get("duration_min")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    let primary_muscles: Vec<String> = serde_json::from_str(&muscles_json)
        .map_err(|e| AppError::persistence(format!("Corrupt workout_session.primary_muscles: {e}")))?;
    let ai_plan: WorkoutPlan = serde_json::from_str(&plan_json)
        .map_err(|e| AppError::persistence(format!("Corrupt workout_session.ai_plan: {e}")))?;

    Ok(WorkoutSession {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        date: row.try_get("date")?,
        goal: row.try_get("goal")?,
        style: row.try_get("style")?,
        duration_min: duration.and_then(|d| u32::try_from(d).ok()),
        primary_muscles,
        ai_plan,
        planned: row.try_get("planned")?,
        created_at,
    })
}
