// ABOUTME: Training history aggregation for generation context
// ABOUTME: Averages logged RPE per exercise and keeps the most demanding exercises first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use pierre_coach_core::models::{ExerciseLogEntry, ExertionAverage};
use tracing::debug;

use crate::config::HistoryConfig;
use crate::database::Database;
use crate::errors::AppResult;

/// Average RPE per exercise, highest first, truncated to `limit`
///
/// Sets without an RPE are ignored; exercises with no rated set are dropped.
/// Ties are broken by exercise name so the output is deterministic.
#[must_use]
pub fn aggregate_exertion(entries: &[ExerciseLogEntry], limit: usize) -> Vec<ExertionAverage> {
    let mut totals: HashMap<&str, (f64, u32)> = HashMap::new();
    for entry in entries {
        for rpe in entry.sets.iter().filter_map(|set| set.rpe) {
            let slot = totals.entry(entry.exercise_name.as_str()).or_insert((0.0, 0));
            slot.0 += rpe;
            slot.1 += 1;
        }
    }

    let mut averages: Vec<ExertionAverage> = totals
        .into_iter()
        .map(|(name, (sum, count))| ExertionAverage {
            exercise_name: name.to_owned(),
            avg_rpe: sum / f64::from(count),
        })
        .collect();

    averages.sort_by(|a, b| {
        b.avg_rpe
            .partial_cmp(&a.avg_rpe)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.exercise_name.cmp(&b.exercise_name))
    });
    averages.truncate(limit);
    averages
}

/// Recent exertion averages for a user; an empty history yields an empty list
///
/// # Errors
///
/// Returns `PersistenceFailure` if the exercise log cannot be read
pub async fn recent_exertion_averages(
    database: &Database,
    user_id: &str,
    today: NaiveDate,
    config: HistoryConfig,
) -> AppResult<Vec<ExertionAverage>> {
    let since = today - Duration::days(i64::from(config.lookback_days));
    let entries = database.list_exercise_logs_since(user_id, since).await?;
    let averages = aggregate_exertion(&entries, config.limit);
    debug!(
        user_id = %user_id,
        entries = entries.len(),
        exercises = averages.len(),
        "Aggregated exertion history"
    );
    Ok(averages)
}
