// ABOUTME: Persisted workout session and exercise log records
// ABOUTME: Sessions carry the plan payload; log entries feed the exertion history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::plan::WorkoutPlan;

/// One generated or planned workout occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Generated identifier returned to the caller
    pub id: String,
    /// Owner
    pub user_id: String,
    /// Day the session is for
    pub date: NaiveDate,
    /// Lowercased goal
    pub goal: Option<String>,
    /// Lowercased style
    pub style: Option<String>,
    /// Requested duration in minutes
    pub duration_min: Option<u32>,
    /// Targeted muscle groups
    pub primary_muscles: Vec<String>,
    /// Validated plan payload
    pub ai_plan: WorkoutPlan,
    /// `true` for future sessions created by period planning
    pub planned: bool,
    /// Insert time
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a session; the id is assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutSession {
    /// Owner
    pub user_id: String,
    /// Day the session is for
    pub date: NaiveDate,
    /// Lowercased goal
    pub goal: Option<String>,
    /// Lowercased style
    pub style: Option<String>,
    /// Requested duration in minutes
    pub duration_min: Option<u32>,
    /// Targeted muscle groups
    pub primary_muscles: Vec<String>,
    /// Validated plan payload
    pub ai_plan: WorkoutPlan,
    /// Future-scheduled flag
    pub planned: bool,
}

/// `{id, date}` pair returned by batch inserts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledWorkout {
    /// Session identifier
    pub id: String,
    /// Scheduled day
    pub date: NaiveDate,
}

/// A single performed set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LoggedSet {
    /// Load used, free-form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Repetitions completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Rate of perceived exertion, 1-10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

/// One logged exercise performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLogEntry {
    /// Row identifier
    pub id: String,
    /// Owner
    pub user_id: String,
    /// Optional backlink to the session the exercise belonged to
    pub workout_session_id: Option<String>,
    /// Exercise name
    pub exercise_name: String,
    /// Sets in the order they were performed
    pub sets: Vec<LoggedSet>,
    /// Day performed
    pub date: NaiveDate,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Average exertion for one exercise over the lookback window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExertionAverage {
    /// Exercise name
    pub exercise_name: String,
    /// Mean RPE across every rated set
    pub avg_rpe: f64,
}
