// ABOUTME: Prompt builder turning profile, exertion history and request parameters into instructions
// ABOUTME: Also owns the fixed output schemas for single plans and period microcycles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Pure prompt construction. Nothing here performs I/O; the same inputs
//! always produce the same instructions and schema.

use std::fmt::Write as _;

use pierre_coach_core::models::{ExertionAverage, UserProfile};
use serde_json::{json, Value};

use super::period::PlanPeriod;
use crate::llm::{OutputSchema, StructuredRequest};

/// Function name the model must call for a single plan
pub const WORKOUT_PLAN_FUNCTION: &str = "generate_workout_plan";

/// Function name the model must call for a period microcycle
pub const MICROCYCLE_FUNCTION: &str = "generate_training_microcycle";

/// Sessions in one generated microcycle
pub const MICROCYCLE_LENGTH: usize = 7;

const WORKOUT_SYSTEM_PROMPT: &str = "You are a certified strength and conditioning coach \
generating a personalized workout plan based on the user's goals, style preferences, \
and target muscle groups. Use the athlete profile to pick appropriate volume and loads, \
and use the recent perceived exertion history to progress or deload exercises.";

const PERIOD_SYSTEM_PROMPT: &str = "You are a certified strength and conditioning coach \
designing a seven-day training microcycle. Balance muscle groups across the week, \
include at least one recovery-focused day, and scale volume to the athlete's fitness \
level and goal. Use the recent perceived exertion history to progress or deload exercises.";

const NOT_SPECIFIED: &str = "not specified";

/// Parameters of a single-session generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutRequest {
    /// Target muscle groups, in request order
    pub muscles: Vec<String>,
    /// Training style, lowercased
    pub style: String,
    /// Session length in minutes
    pub duration_min: u32,
    /// Training goal, lowercased
    pub goal: String,
}

impl WorkoutRequest {
    /// Build a request, normalising free-text fields for storage and comparison
    #[must_use]
    pub fn new(muscles: Vec<String>, style: &str, duration_min: u32, goal: &str) -> Self {
        Self {
            muscles: muscles
                .iter()
                .map(|m| m.trim().to_owned())
                .filter(|m| !m.is_empty())
                .collect(),
            style: normalize_label(style),
            duration_min,
            goal: normalize_label(goal),
        }
    }
}

/// Lowercase and trim a free-text label
#[must_use]
pub fn normalize_label(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Instructions and schema for a single workout plan
#[must_use]
pub fn build_workout_prompt(
    profile: &UserProfile,
    history: &[ExertionAverage],
    request: &WorkoutRequest,
) -> StructuredRequest {
    let mut user = String::from("Create a workout plan with the following parameters:\n");
    let _ = writeln!(user, "Muscles: {}", request.muscles.join(", "));
    let _ = writeln!(user, "Style: {}", request.style);
    let _ = writeln!(user, "Goal: {}", request.goal);
    let _ = writeln!(user, "Duration: {} minutes", request.duration_min);
    user.push('\n');
    write_profile(&mut user, profile);
    user.push('\n');
    write_history(&mut user, history);
    user.push_str("\nReturn every exercise with a name, a set count, a rep target and, when useful, a weight suggestion.");

    StructuredRequest::new(WORKOUT_SYSTEM_PROMPT, user, workout_plan_schema())
}

/// Instructions and schema for a period microcycle
#[must_use]
pub fn build_period_prompt(
    profile: &UserProfile,
    history: &[ExertionAverage],
    period: PlanPeriod,
) -> StructuredRequest {
    let goal = profile
        .goal
        .as_deref()
        .map_or_else(|| profile.training_goal().as_str().to_owned(), normalize_label);

    let mut user = format!(
        "Design a {MICROCYCLE_LENGTH}-day training microcycle that will be repeated across the next {}.\n",
        period.as_str()
    );
    let _ = writeln!(user, "Goal: {goal}");
    user.push('\n');
    write_profile(&mut user, profile);
    user.push('\n');
    write_history(&mut user, history);
    let _ = write!(
        user,
        "\nReturn exactly {MICROCYCLE_LENGTH} sessions in day order. Give each a style, a duration in minutes, \
         its primary muscle groups and its exercises."
    );

    StructuredRequest::new(PERIOD_SYSTEM_PROMPT, user, microcycle_schema())
}

fn write_profile(out: &mut String, profile: &UserProfile) {
    out.push_str("Athlete profile:\n");
    let _ = writeln!(
        out,
        "Age: {}",
        profile.age.map_or_else(|| NOT_SPECIFIED.to_owned(), |a| a.to_string())
    );
    let _ = writeln!(
        out,
        "Gender: {}",
        profile.gender.map_or(NOT_SPECIFIED, |g| g.as_str())
    );
    let _ = writeln!(
        out,
        "Height: {}",
        profile.height.map_or_else(
            || NOT_SPECIFIED.to_owned(),
            |h| format!("{} {}", format_measure(h), profile.height_unit.as_str())
        )
    );
    let _ = writeln!(
        out,
        "Weight: {}",
        profile.weight.map_or_else(
            || NOT_SPECIFIED.to_owned(),
            |w| format!("{} {}", format_measure(w), profile.weight_unit.as_str())
        )
    );
    let _ = writeln!(
        out,
        "Fitness level: {}",
        profile.fitness_level.map_or(NOT_SPECIFIED, |f| f.as_str())
    );
    let _ = writeln!(
        out,
        "Activity level: {}",
        profile.activity_level.map_or(NOT_SPECIFIED, |a| a.as_str())
    );
}

fn write_history(out: &mut String, history: &[ExertionAverage]) {
    if history.is_empty() {
        out.push_str("No logged exercise history.\n");
        return;
    }
    out.push_str("Recent perceived exertion (average RPE, highest first):\n");
    for item in history {
        let _ = writeln!(out, "- {}: {:.1}", item.exercise_name, item.avg_rpe);
    }
}

/// Whole numbers render without a fractional part
fn format_measure(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn exercise_item_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "Exercise name" },
            "sets": { "type": "integer", "minimum": 1, "description": "Number of working sets" },
            "reps": { "type": "string", "description": "Rep target, e.g. 8-12" },
            "weight": { "type": "string", "description": "Suggested load, e.g. 60kg or bodyweight" }
        },
        "required": ["name", "sets", "reps"]
    })
}

/// Fixed schema for a single plan: `{exercises: [{name, sets, reps, weight?}]}`
#[must_use]
pub fn workout_plan_schema() -> OutputSchema {
    OutputSchema::new(
        WORKOUT_PLAN_FUNCTION,
        "Generate a structured workout plan",
        json!({
            "type": "object",
            "properties": {
                "exercises": {
                    "type": "array",
                    "minItems": 1,
                    "items": exercise_item_schema()
                }
            },
            "required": ["exercises"]
        }),
    )
}

/// Fixed schema for a seven-session microcycle
#[must_use]
pub fn microcycle_schema() -> OutputSchema {
    OutputSchema::new(
        MICROCYCLE_FUNCTION,
        "Generate a seven-day training microcycle",
        json!({
            "type": "object",
            "properties": {
                "sessions": {
                    "type": "array",
                    "minItems": MICROCYCLE_LENGTH,
                    "maxItems": MICROCYCLE_LENGTH,
                    "items": {
                        "type": "object",
                        "properties": {
                            "style": { "type": "string" },
                            "duration_min": { "type": "integer", "minimum": 1 },
                            "primary_muscles": { "type": "array", "items": { "type": "string" } },
                            "exercises": {
                                "type": "array",
                                "minItems": 1,
                                "items": exercise_item_schema()
                            }
                        },
                        "required": ["style", "duration_min", "primary_muscles", "exercises"]
                    }
                }
            },
            "required": ["sessions"]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pierre_coach_core::models::{Gender, HeightUnit, WeightUnit};

    fn profile() -> UserProfile {
        let mut profile = UserProfile::empty("user-1");
        profile.age = Some(31);
        profile.gender = Some(Gender::Female);
        profile.height = Some(65.5);
        profile.height_unit = HeightUnit::In;
        profile.weight = Some(140.0);
        profile.weight_unit = WeightUnit::Lbs;
        profile
    }

    #[test]
    fn test_request_normalizes_labels() {
        let request = WorkoutRequest::new(
            vec![" Chest ".to_owned(), String::new(), "Triceps".to_owned()],
            "  HyperTrophy",
            45,
            "Gain_Muscle ",
        );
        assert_eq!(request.style, "hypertrophy");
        assert_eq!(request.goal, "gain_muscle");
        assert_eq!(request.muscles, vec!["Chest", "Triceps"]);
    }

    #[test]
    fn test_workout_prompt_passes_units_verbatim() {
        let request = WorkoutRequest::new(vec!["legs".to_owned()], "strength", 60, "maintain");
        let prompt = build_workout_prompt(&profile(), &[], &request);

        assert!(prompt.user.content.contains("Height: 65.5 in"));
        assert!(prompt.user.content.contains("Weight: 140 lbs"));
        assert!(prompt.user.content.contains("Duration: 60 minutes"));
        assert!(prompt.user.content.contains("No logged exercise history."));
        assert!(prompt.user.content.contains("Fitness level: not specified"));
        assert_eq!(prompt.schema.name, WORKOUT_PLAN_FUNCTION);
    }

    #[test]
    fn test_workout_prompt_lists_history() {
        let history = vec![ExertionAverage {
            exercise_name: "Squat".to_owned(),
            avg_rpe: 8.5,
        }];
        let request = WorkoutRequest::new(vec!["legs".to_owned()], "strength", 60, "maintain");
        let prompt = build_workout_prompt(&profile(), &history, &request);

        assert!(prompt.user.content.contains("- Squat: 8.5"));
    }

    #[test]
    fn test_schema_is_constant_across_requests() {
        let a = build_workout_prompt(
            &profile(),
            &[],
            &WorkoutRequest::new(vec!["back".to_owned()], "circuit", 30, "lose_weight"),
        );
        let b = build_workout_prompt(
            &UserProfile::empty("other"),
            &[],
            &WorkoutRequest::new(vec!["arms".to_owned()], "strength", 90, "maintain"),
        );
        assert_eq!(a.schema, b.schema);
        assert_ne!(a.user, b.user);
        assert_eq!(
            a.schema.parameters["properties"]["exercises"]["items"]["required"],
            json!(["name", "sets", "reps"])
        );
    }

    #[test]
    fn test_period_prompt_uses_profile_goal() {
        let mut profile = profile();
        profile.goal = Some("Lose_Weight".to_owned());
        let prompt = build_period_prompt(&profile, &[], PlanPeriod::Week);

        assert!(prompt.user.content.contains("Goal: lose_weight"));
        assert!(prompt.user.content.contains("next week"));
        assert_eq!(prompt.schema.name, MICROCYCLE_FUNCTION);
    }
}
