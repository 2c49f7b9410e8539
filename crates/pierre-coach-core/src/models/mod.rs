// ABOUTME: Domain models for profiles, plans, sessions and exercise logs
// ABOUTME: Re-exports every model type used by the service crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `UserProfile`: anthropometrics, activity level and goal, one per user
//! - `WorkoutPlan`: validated structured generation output
//! - `WorkoutSession`: a persisted generated or planned workout
//! - `ExerciseLogEntry`: a logged exercise performance, source of exertion history

mod plan;
mod profile;
mod session;

pub use plan::{Microcycle, MicrocycleSession, PlannedExercise, WorkoutPlan};
pub use profile::{
    ActivityLevel, FitnessLevel, Gender, HeightUnit, TrainingGoal, UserProfile, WeightUnit,
};
pub use session::{
    ExerciseLogEntry, ExertionAverage, LoggedSet, NewWorkoutSession, ScheduledWorkout,
    WorkoutSession,
};
