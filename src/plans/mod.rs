// ABOUTME: Workout plan generation: prompts, output validation, exertion history and orchestration
// ABOUTME: Exposes the PlanService used by the plan and period routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plans
//!
//! - [`history`]: per-exercise average RPE over the lookback window
//! - [`prompts`]: instruction text and fixed output schemas
//! - [`parser`]: validation of generated payloads
//! - [`period`]: week and month date layout
//! - [`service`]: the pipeline tying these to storage and generation

/// Exertion history aggregation
pub mod history;
/// Structured output validation
pub mod parser;
/// Planning periods
pub mod period;
/// Prompt construction
pub mod prompts;
/// Pipeline orchestration
pub mod service;

pub use period::PlanPeriod;
pub use prompts::WorkoutRequest;
pub use service::{GeneratedWorkout, PeriodPlan, PlanService, PlanStage};
