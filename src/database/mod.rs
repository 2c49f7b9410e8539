// ABOUTME: SQLite persistence for profiles, exercise logs, workout sessions and food logs
// ABOUTME: Owns the connection pool and runs idempotent schema migrations at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Storage accessors are grouped per table family and implemented as
//! inherent methods on [`Database`]. JSON-valued columns (set lists,
//! muscle groups, plan payloads) are stored as TEXT.

mod exercise_logs;
mod nutrition;
mod profiles;
mod workout_sessions;

pub use exercise_logs::NewExerciseLog;
pub use nutrition::{DailyIntake, Food, FoodLogInput, LoggedFood, PLACEHOLDER_FOOD};

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Database manager shared by every request
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and apply migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or a migration fails
    pub async fn new(database_url: &str) -> Result<Self> {
        let connected = if database_url.contains(":memory:") {
            // Every connection to :memory: is a separate database, keep exactly one alive
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await
        } else {
            let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
            if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
            // Ensure SQLite creates the database file if it doesn't exist
            SqlitePoolOptions::new()
                .max_connections(8)
                .connect(&format!("{database_url}?mode=rwc"))
                .await
        };
        let pool = connected.with_context(|| format!("Failed to open database {database_url}"))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the underlying pool
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run all schema migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_profiles().await?;
        self.migrate_workouts().await?;
        self.migrate_nutrition().await?;
        info!("Database migrations applied");
        Ok(())
    }

    async fn migrate_profiles(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS profile (
                user_id TEXT PRIMARY KEY,
                username TEXT,
                age INTEGER,
                gender TEXT CHECK (gender IS NULL OR gender IN ('male', 'female', 'other')),
                height REAL,
                height_unit TEXT NOT NULL DEFAULT 'cm' CHECK (height_unit IN ('cm', 'in')),
                weight REAL,
                weight_unit TEXT NOT NULL DEFAULT 'kg' CHECK (weight_unit IN ('kg', 'lbs')),
                activity_level TEXT,
                fitness_level TEXT,
                goal TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create profile table")?;
        Ok(())
    }

    async fn migrate_workouts(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_session (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                goal TEXT,
                style TEXT,
                duration_min INTEGER,
                primary_muscles TEXT NOT NULL DEFAULT '[]',
                ai_plan TEXT NOT NULL,
                planned INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create workout_session table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_session_user_date ON workout_session(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercise_log (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                workout_session_id TEXT REFERENCES workout_session(id) ON DELETE SET NULL,
                exercise_name TEXT NOT NULL,
                sets TEXT NOT NULL DEFAULT '[]',
                date TEXT NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create exercise_log table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_exercise_log_user_date ON exercise_log(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_nutrition(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS food (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                calories REAL NOT NULL,
                protein REAL NOT NULL,
                carbs REAL NOT NULL,
                fat REAL NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create food table")?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS food_log (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                meal TEXT NOT NULL CHECK (meal IN ('breakfast', 'lunch', 'dinner', 'snack')),
                food_id TEXT NOT NULL REFERENCES food(id),
                grams REAL NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create food_log table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_food_log_user_date ON food_log(user_id, date)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
