// ABOUTME: Workout plan payload produced by structured generation
// ABOUTME: Plan, planned exercise and the period microcycle shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// A single prescribed exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedExercise {
    /// Exercise name as shown to the user
    pub name: String,
    /// Number of working sets, at least 1
    pub sets: u32,
    /// Rep target, e.g. `"8-12"` or `"30s"`
    pub reps: String,
    /// Optional load suggestion, e.g. `"60kg"` or `"bodyweight"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

/// Validated plan: a non-empty ordered list of exercises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Exercises in execution order
    pub exercises: Vec<PlannedExercise>,
}

/// One session template inside a generated microcycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicrocycleSession {
    /// Session focus, e.g. `"strength"` or `"recovery"`
    pub style: String,
    /// Planned length in minutes
    pub duration_min: u32,
    /// Muscle groups the session targets
    pub primary_muscles: Vec<String>,
    /// Exercise prescription
    pub plan: WorkoutPlan,
}

/// Seven-day template laid across a planning period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Microcycle {
    /// Day templates in order; cycled when the period is longer
    pub sessions: Vec<MicrocycleSession>,
}
