// ABOUTME: Plan validator and parser for structured generation output
// ABOUTME: Accepts tool-call JSON first, then JSON embedded in free text, otherwise fails hard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Validator/Parser
//!
//! Candidate payloads are tried in order:
//!
//! 1. the forced function-call arguments
//! 2. a code-fenced JSON block inside the assistant text
//! 3. the outermost `{...}` span of the assistant text
//!
//! The first candidate that parses and satisfies the schema wins. If none
//! does, the result is `GenerationFailed`; no placeholder plan is ever
//! substituted.

use std::sync::OnceLock;

use pierre_coach_core::models::{Microcycle, MicrocycleSession, PlannedExercise, WorkoutPlan};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::StructuredOutput;

static FENCED_JSON: OnceLock<Option<Regex>> = OnceLock::new();

fn fenced_json() -> Option<&'static Regex> {
    FENCED_JSON
        .get_or_init(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").ok())
        .as_ref()
}

/// Parse and validate a single workout plan
///
/// # Errors
///
/// Returns `GenerationFailed` when no candidate payload satisfies the plan schema
pub fn parse_workout_plan(output: &StructuredOutput) -> AppResult<WorkoutPlan> {
    parse_with(output, "workout plan", |value| {
        validate_plan(value.as_object().ok_or("payload is not an object")?)
    })
}

/// Parse and validate a period microcycle
///
/// # Errors
///
/// Returns `GenerationFailed` when no candidate payload satisfies the microcycle schema
pub fn parse_microcycle(output: &StructuredOutput) -> AppResult<Microcycle> {
    parse_with(output, "training microcycle", validate_microcycle)
}

fn parse_with<T>(
    output: &StructuredOutput,
    what: &str,
    validate: impl Fn(&Value) -> Result<T, String>,
) -> AppResult<T> {
    let mut last_error = String::from("no structured payload");

    for (source, candidate) in candidates(output) {
        let value: Value = match serde_json::from_str(&candidate) {
            Ok(value) => value,
            Err(e) => {
                debug!(source, error = %e, "Candidate payload is not JSON");
                last_error = format!("{source} is not valid JSON: {e}");
                continue;
            }
        };
        match validate(&value) {
            Ok(parsed) => {
                debug!(source, "Accepted generated {what}");
                return Ok(parsed);
            }
            Err(reason) => {
                debug!(source, reason = %reason, "Candidate payload failed validation");
                last_error = format!("{source} failed validation: {reason}");
            }
        }
    }

    warn!(reason = %last_error, "Generated {what} could not be parsed");
    Err(AppError::generation_failed(format!(
        "Failed to parse generated {what}: {last_error}"
    )))
}

/// Candidate JSON strings in priority order, tagged with where they came from
fn candidates(output: &StructuredOutput) -> Vec<(&'static str, String)> {
    let mut found = Vec::new();

    if let Some(arguments) = output.arguments.as_deref().filter(|a| !a.trim().is_empty()) {
        found.push(("function arguments", arguments.to_owned()));
    }

    if let Some(content) = output.content.as_deref() {
        if let Some(captures) = fenced_json().and_then(|re| re.captures(content)) {
            if let Some(block) = captures.get(1) {
                found.push(("fenced JSON block", block.as_str().to_owned()));
            }
        }
        if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
            if start < end {
                found.push(("embedded JSON object", content[start..=end].to_owned()));
            }
        }
    }

    found
}

fn validate_plan(object: &Map<String, Value>) -> Result<WorkoutPlan, String> {
    let items = object
        .get("exercises")
        .and_then(Value::as_array)
        .ok_or("missing exercises array")?;
    if items.is_empty() {
        return Err("exercises array is empty".to_owned());
    }

    let exercises = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            validate_exercise(item).map_err(|e| format!("exercise {}: {e}", index + 1))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WorkoutPlan { exercises })
}

fn validate_exercise(item: &Value) -> Result<PlannedExercise, String> {
    let object = item.as_object().ok_or("not an object")?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or("name must be a non-empty string")?;

    let sets = object
        .get("sets")
        .and_then(as_positive_integer)
        .ok_or("sets must be an integer >= 1")?;

    let reps = object
        .get("reps")
        .and_then(scalar_to_string)
        .ok_or("reps must be a non-empty string")?;

    let weight = match object.get("weight") {
        None | Some(Value::Null) => None,
        Some(value) => Some(scalar_to_string(value).ok_or("weight must be a string")?),
    };

    Ok(PlannedExercise {
        name: name.to_owned(),
        sets,
        reps,
        weight,
    })
}

fn validate_microcycle(value: &Value) -> Result<Microcycle, String> {
    let items = value
        .get("sessions")
        .and_then(Value::as_array)
        .ok_or("missing sessions array")?;
    if items.is_empty() {
        return Err("sessions array is empty".to_owned());
    }

    let sessions = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            validate_microcycle_session(item).map_err(|e| format!("session {}: {e}", index + 1))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Microcycle { sessions })
}

fn validate_microcycle_session(item: &Value) -> Result<MicrocycleSession, String> {
    let object = item.as_object().ok_or("not an object")?;

    let style = object
        .get("style")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .ok_or("style must be a non-empty string")?;

    let duration_min = object
        .get("duration_min")
        .and_then(as_positive_integer)
        .ok_or("duration_min must be an integer >= 1")?;

    let primary_muscles = match object.get("primary_muscles") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(muscles)) => muscles
            .iter()
            .filter_map(Value::as_str)
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty())
            .collect(),
        Some(_) => return Err("primary_muscles must be an array of strings".to_owned()),
    };

    let plan = validate_plan(object)?;

    Ok(MicrocycleSession {
        style,
        duration_min,
        primary_muscles,
        plan,
    })
}

/// Integers >= 1; numeric strings and whole floats are accepted
fn as_positive_integer(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract().abs() < f64::EPSILON && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(number).ok().filter(|n| *n >= 1)
}

/// Strings are trimmed; bare numbers are rendered as text
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pierre_coach_core::errors::ErrorCode;

    const VALID: &str = r#"{"exercises":[{"name":"Bench Press","sets":4,"reps":"8-10","weight":"60kg"},{"name":"Dips","sets":3,"reps":"12"}]}"#;

    #[test]
    fn test_function_arguments_accepted() {
        let plan = parse_workout_plan(&StructuredOutput::from_arguments(VALID)).unwrap();

        assert_eq!(plan.exercises.len(), 2);
        assert_eq!(plan.exercises[0].weight.as_deref(), Some("60kg"));
        assert_eq!(plan.exercises[1].weight, None);
    }

    #[test]
    fn test_fenced_block_fallback() {
        let content = format!("Here is your plan:\n```json\n{VALID}\n```\nEnjoy!");
        let plan = parse_workout_plan(&StructuredOutput::from_content(content)).unwrap();
        assert_eq!(plan.exercises[0].name, "Bench Press");
    }

    #[test]
    fn test_embedded_object_fallback() {
        let content = format!("Plan follows {VALID} good luck");
        let plan = parse_workout_plan(&StructuredOutput::from_content(content)).unwrap();
        assert_eq!(plan.exercises.len(), 2);
    }

    #[test]
    fn test_invalid_arguments_fall_back_to_content() {
        let output = StructuredOutput {
            arguments: Some("{\"exercises\": [".to_owned()),
            content: Some(format!("```\n{VALID}\n```")),
            ..StructuredOutput::default()
        };
        assert!(parse_workout_plan(&output).is_ok());
    }

    #[test]
    fn test_unparsable_text_is_generation_failure() {
        let err = parse_workout_plan(&StructuredOutput::from_content(
            "Sorry, I cannot help with that.",
        ))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::GenerationFailed);
    }

    #[test]
    fn test_empty_exercise_list_rejected() {
        let err = parse_workout_plan(&StructuredOutput::from_arguments(r#"{"exercises":[]}"#))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GenerationFailed);
        assert!(err.message.contains("empty"));
    }

    #[test]
    fn test_zero_sets_rejected() {
        let err = parse_workout_plan(&StructuredOutput::from_arguments(
            r#"{"exercises":[{"name":"Squat","sets":0,"reps":"5"}]}"#,
        ))
        .unwrap_err();
        assert!(err.message.contains("sets"));
    }

    #[test]
    fn test_numeric_reps_coerced_to_string() {
        let plan = parse_workout_plan(&StructuredOutput::from_arguments(
            r#"{"exercises":[{"name":"Squat","sets":"5","reps":5,"weight":100}]}"#,
        ))
        .unwrap();
        assert_eq!(plan.exercises[0].sets, 5);
        assert_eq!(plan.exercises[0].reps, "5");
        assert_eq!(plan.exercises[0].weight.as_deref(), Some("100"));
    }

    #[test]
    fn test_microcycle_parsing() {
        let arguments = r#"{"sessions":[
            {"style":"Strength","duration_min":45,"primary_muscles":["legs"],"exercises":[{"name":"Squat","sets":5,"reps":"5"}]},
            {"style":"recovery","duration_min":30,"primary_muscles":[],"exercises":[{"name":"Walk","sets":1,"reps":"30 min"}]}
        ]}"#;
        let cycle = parse_microcycle(&StructuredOutput::from_arguments(arguments)).unwrap();

        assert_eq!(cycle.sessions.len(), 2);
        assert_eq!(cycle.sessions[0].style, "strength");
        assert_eq!(cycle.sessions[1].plan.exercises[0].reps, "30 min");
    }

    #[test]
    fn test_microcycle_session_without_exercises_rejected() {
        let arguments = r#"{"sessions":[{"style":"rest","duration_min":10,"primary_muscles":[],"exercises":[]}]}"#;
        let err = parse_microcycle(&StructuredOutput::from_arguments(arguments)).unwrap_err();
        assert!(err.message.contains("session 1"));
    }
}
