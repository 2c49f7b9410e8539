// ABOUTME: Route module organization for the coaching HTTP endpoints
// ABOUTME: Each domain module holds route definitions and thin handlers that delegate to services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Routes are grouped by domain. Every user-scoped POST handler follows
//! the same order: parse the body, require `userId`, authenticate the
//! bearer token, check ownership, then delegate.

/// Exercise log write path
pub mod exercise_logs;
/// Health and readiness
pub mod health;
/// Nutrition analysis and food classification
pub mod nutrition;
/// Workout plan generation
pub mod plans;
/// Profile accessors
pub mod profile;
/// Shared body handling
pub mod request;
/// Workout session retrieval
pub mod sessions;

pub use exercise_logs::ExerciseLogRoutes;
pub use health::HealthRoutes;
pub use nutrition::NutritionRoutes;
pub use plans::PlanRoutes;
pub use profile::ProfileRoutes;
pub use sessions::SessionRoutes;
