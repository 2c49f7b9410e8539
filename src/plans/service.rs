// ABOUTME: Plan generation pipeline: profile, history, prompt, generation, validation, persistence
// ABOUTME: Bounds every generation call with a timeout and writes nothing until validation succeeds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Pipeline
//!
//! Single-session generation and period planning share one sequence:
//! fetch the profile (creating it if absent) and the exertion history,
//! build the prompt, call the generation service under a timeout, validate
//! the output, then insert. Any failure discards the request's work; the
//! only write happens after validation, so a failed run leaves no rows.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use pierre_coach_core::models::{
    Microcycle, NewWorkoutSession, ScheduledWorkout, UserProfile, WorkoutPlan,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::history::recent_exertion_averages;
use super::parser::{parse_microcycle, parse_workout_plan};
use super::period::PlanPeriod;
use super::prompts::{build_period_prompt, build_workout_prompt, normalize_label, WorkoutRequest};
use crate::config::HistoryConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::llm::{GenerationClient, StructuredOutput, StructuredRequest};
use crate::resources::ServerResources;

/// Stage of a plan run; only `Done` and `Failed` are terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStage {
    /// Checking request parameters
    ValidatingInput,
    /// Loading or creating the profile
    FetchingProfile,
    /// Aggregating exertion history
    FetchingHistory,
    /// Waiting on the generation service
    GeneratingPlan,
    /// Writing sessions
    PersistingBatch,
    /// Sessions written
    Done,
    /// Run aborted; nothing was written
    Failed(String),
}

impl PlanStage {
    /// Stage name for logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidatingInput => "validating_input",
            Self::FetchingProfile => "fetching_profile",
            Self::FetchingHistory => "fetching_history",
            Self::GeneratingPlan => "generating_plan",
            Self::PersistingBatch => "persisting_batch",
            Self::Done => "done",
            Self::Failed(_) => "failed",
        }
    }

    /// Whether the run has finished
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    /// The only non-failure successor of this stage
    #[must_use]
    pub const fn successor(&self) -> Option<Self> {
        match self {
            Self::ValidatingInput => Some(Self::FetchingProfile),
            Self::FetchingProfile => Some(Self::FetchingHistory),
            Self::FetchingHistory => Some(Self::GeneratingPlan),
            Self::GeneratingPlan => Some(Self::PersistingBatch),
            Self::PersistingBatch => Some(Self::Done),
            Self::Done | Self::Failed(_) => None,
        }
    }

    /// Legal transitions: the linear successor, or `Failed` from any live stage
    #[must_use]
    pub fn can_transition_to(&self, next: &Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(next, Self::Failed(_)) || self.successor().as_ref() == Some(next)
    }
}

impl fmt::Display for PlanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed({reason})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Tracks one period run through its stages
#[derive(Debug)]
struct PlanRun {
    stage: PlanStage,
}

impl PlanRun {
    const fn new() -> Self {
        Self {
            stage: PlanStage::ValidatingInput,
        }
    }

    /// Move to the next stage
    fn advance(&mut self) -> AppResult<()> {
        let next = self
            .stage
            .successor()
            .ok_or_else(|| AppError::internal(format!("No stage follows {}", self.stage)))?;
        debug!(from = self.stage.as_str(), to = next.as_str(), "Plan stage transition");
        self.stage = next;
        Ok(())
    }

    /// Record a failure and hand the error back
    fn fail(&mut self, error: AppError) -> AppError {
        warn!(stage = self.stage.as_str(), error = %error, "Plan run failed");
        self.stage = PlanStage::Failed(error.message.clone());
        error
    }

    /// Run `result` in the current stage, failing the run on error
    fn check<T>(&mut self, result: AppResult<T>) -> AppResult<T> {
        result.map_err(|e| self.fail(e))
    }

    /// Parse the requested period while validating input
    fn validate_period(&mut self, period: &str) -> AppResult<PlanPeriod> {
        let parsed = PlanPeriod::parse(period)
            .ok_or_else(|| AppError::bad_request("period must be \"week\" or \"month\""));
        self.check(parsed)
    }
}

/// Result of a single-session generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWorkout {
    /// Id of the persisted session
    pub session_id: String,
    /// Plan exactly as persisted
    pub plan: WorkoutPlan,
}

/// Result of period planning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodPlan {
    /// Human-readable summary
    pub message: String,
    /// One entry per created session
    pub workouts: Vec<ScheduledWorkout>,
}

/// Plan pipeline bound to the shared server resources
#[derive(Clone)]
pub struct PlanService {
    database: Database,
    generation: Arc<dyn GenerationClient>,
    generation_timeout: Duration,
    history: HistoryConfig,
}

impl PlanService {
    /// Build a service from explicit collaborators
    #[must_use]
    pub fn new(
        database: Database,
        generation: Arc<dyn GenerationClient>,
        generation_timeout: Duration,
        history: HistoryConfig,
    ) -> Self {
        Self {
            database,
            generation,
            generation_timeout,
            history,
        }
    }

    /// Build a service from the shared server resources
    #[must_use]
    pub fn from_resources(resources: &ServerResources) -> Self {
        Self::new(
            resources.database.clone(),
            Arc::clone(&resources.generation),
            resources.config.generation.timeout,
            resources.config.history,
        )
    }

    /// Database the pipeline writes to
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.database
    }

    /// Generate, validate and persist one workout session dated `today`
    ///
    /// # Errors
    ///
    /// Returns `UpstreamFailure`, `GenerationFailed` or `PersistenceFailure`;
    /// no session is written on any error
    #[instrument(skip(self, request), fields(user_id = %user_id, style = %request.style))]
    pub async fn generate_workout(
        &self,
        user_id: &str,
        request: WorkoutRequest,
        today: NaiveDate,
    ) -> AppResult<GeneratedWorkout> {
        let (profile, history) = tokio::try_join!(
            self.database.get_or_create_profile(user_id),
            recent_exertion_averages(&self.database, user_id, today, self.history),
        )?;

        let prompt = build_workout_prompt(&profile, &history, &request);
        let output = self.generate_structured(&prompt).await?;
        let plan = parse_workout_plan(&output)?;

        let session_id = self
            .database
            .insert_workout_session(&NewWorkoutSession {
                user_id: user_id.to_owned(),
                date: today,
                goal: Some(request.goal),
                style: Some(request.style),
                duration_min: Some(request.duration_min),
                primary_muscles: request.muscles,
                ai_plan: plan.clone(),
                planned: false,
            })
            .await?;

        info!(session_id = %session_id, exercises = plan.exercises.len(), "Workout plan generated");
        Ok(GeneratedWorkout { session_id, plan })
    }

    /// Generate a microcycle and lay it across every day of `period`, starting tomorrow
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a period other than `week` or `month`, otherwise
    /// the first failing stage's error; the batch insert is atomic, so either
    /// every session is written or none is
    #[instrument(skip(self), fields(user_id = %user_id, period = %period))]
    pub async fn plan_period(
        &self,
        user_id: &str,
        period: &str,
        today: NaiveDate,
    ) -> AppResult<PeriodPlan> {
        let mut run = PlanRun::new();
        let period = run.validate_period(period)?;
        let dates = period.session_dates(today);

        run.advance()?;
        let profile = run.check(self.database.get_or_create_profile(user_id).await)?;

        run.advance()?;
        let history = run.check(
            recent_exertion_averages(&self.database, user_id, today, self.history).await,
        )?;

        run.advance()?;
        let prompt = build_period_prompt(&profile, &history, period);
        let output = run.check(self.generate_structured(&prompt).await)?;
        let microcycle = run.check(parse_microcycle(&output))?;

        run.advance()?;
        let sessions = layout_sessions(&profile, &microcycle, &dates);
        let workouts = run.check(self.database.insert_workout_sessions(&sessions).await)?;

        run.advance()?;
        info!(count = workouts.len(), "Period plan persisted");
        Ok(PeriodPlan {
            message: format!(
                "Created {} planned workouts for the next {}",
                workouts.len(),
                period.as_str()
            ),
            workouts,
        })
    }

    /// One generation call bounded by the configured timeout
    ///
    /// # Errors
    ///
    /// Returns `UpstreamFailure` on expiry, otherwise whatever the client returns
    pub async fn generate_structured(
        &self,
        request: &StructuredRequest,
    ) -> AppResult<StructuredOutput> {
        debug!(
            provider = self.generation.name(),
            timeout_secs = self.generation_timeout.as_secs_f64(),
            "Calling generation service"
        );
        let output =
            tokio::time::timeout(self.generation_timeout, self.generation.generate(request))
                .await
                .map_err(|_| {
                    warn!(provider = self.generation.name(), "Generation call exceeded timeout");
                    AppError::upstream(
                        "Generation service",
                        format!("timed out after {}s", self.generation_timeout.as_secs_f64()),
                    )
                })??;

        let usage = output.usage.unwrap_or_default();
        info!(
            provider = self.generation.name(),
            function = %request.schema.name,
            model = output.model.as_deref().unwrap_or("unknown"),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "Generation call completed"
        );
        Ok(output)
    }
}

/// Cycle the microcycle templates over `dates`, one planned session per day
fn layout_sessions(
    profile: &UserProfile,
    microcycle: &Microcycle,
    dates: &[NaiveDate],
) -> Vec<NewWorkoutSession> {
    let goal = profile
        .goal
        .as_deref()
        .map_or_else(|| profile.training_goal().as_str().to_owned(), normalize_label);

    dates
        .iter()
        .zip(microcycle.sessions.iter().cycle())
        .map(|(date, template)| NewWorkoutSession {
            user_id: profile.user_id.clone(),
            date: *date,
            goal: Some(goal.clone()),
            style: Some(template.style.clone()),
            duration_min: Some(template.duration_min),
            primary_muscles: template.primary_muscles.clone(),
            ai_plan: template.plan.clone(),
            planned: true,
        })
        .collect()
}
