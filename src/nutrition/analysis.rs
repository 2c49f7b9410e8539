// ABOUTME: Seven-day nutrition analysis against the profile's daily targets
// ABOUTME: Fills days without food logs and derives intake recommendations for today
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, instrument};

use super::calculator::{calculate_targets, NutritionTargets};
use crate::database::{DailyIntake, Database};
use crate::errors::{AppError, AppResult};

/// Days covered by the analysis window, today included
pub const ANALYSIS_WINDOW_DAYS: i64 = 7;

const LOW_CALORIES: &str = "Your calorie intake is significantly below your target. \
Consider adding more nutrient-dense foods to your diet.";
const HIGH_CALORIES: &str = "Your calorie intake is above your target. \
Consider reducing portion sizes or choosing lower-calorie options.";
const LOW_PROTEIN: &str = "Your protein intake is below the recommended amount. \
Consider adding more lean protein sources like chicken, fish, or plant-based proteins.";

/// Rounded totals for one day of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    /// Day
    pub date: NaiveDate,
    /// Kilocalories
    pub calories: i64,
    /// Protein grams
    pub protein: i64,
    /// Carbohydrate grams
    pub carbs: i64,
    /// Fat grams
    pub fat: i64,
    /// Daily calorie target
    pub target_calories: i64,
}

/// Unrounded intake for a day
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Intake {
    /// Kilocalories
    pub calories: f64,
    /// Protein grams
    pub protein: f64,
    /// Carbohydrate grams
    pub carbs: f64,
    /// Fat grams
    pub fat: f64,
}

impl From<&DailyIntake> for Intake {
    fn from(day: &DailyIntake) -> Self {
        Self {
            calories: day.calories,
            protein: day.protein,
            carbs: day.carbs,
            fat: day.fat,
        }
    }
}

/// Today's intake next to the targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TodayNutrition {
    /// Logged so far today
    pub current: Intake,
    /// Daily targets
    pub target: NutritionTargets,
}

/// Full analysis response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionAnalysis {
    /// One entry per day of the window, oldest first
    pub daily_totals: Vec<DailyTotal>,
    /// Today against target
    pub today_nutrition: TodayNutrition,
    /// Advice derived from today's intake
    pub recommendations: Vec<String>,
}

/// Analyse the last seven days of food logs for `user_id`
///
/// # Errors
///
/// Returns `NotFound` without a profile, `BadRequest` when the profile lacks
/// measurements, and `PersistenceFailure` when the food log cannot be read
#[instrument(skip(database))]
pub async fn analyze_nutrition(
    database: &Database,
    user_id: &str,
    today: NaiveDate,
) -> AppResult<NutritionAnalysis> {
    let profile = database
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile"))?;
    let targets = calculate_targets(&profile)?;

    let from = today - Duration::days(ANALYSIS_WINDOW_DAYS - 1);
    let logged = database.daily_intake(user_id, from, today).await?;
    debug!(days_with_logs = logged.len(), "Loaded daily intake");

    Ok(build_analysis(&logged, targets, from, today))
}

/// Assemble the analysis from per-day sums; days absent from `logged` count as zero
#[must_use]
pub fn build_analysis(
    logged: &[DailyIntake],
    targets: NutritionTargets,
    from: NaiveDate,
    today: NaiveDate,
) -> NutritionAnalysis {
    let intake_on = |date: NaiveDate| {
        logged
            .iter()
            .find(|day| day.date == date)
            .map(Intake::from)
            .unwrap_or_default()
    };

    let daily_totals = from
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| {
            let intake = intake_on(date);
            DailyTotal {
                date,
                calories: intake.calories.round() as i64,
                protein: intake.protein.round() as i64,
                carbs: intake.carbs.round() as i64,
                fat: intake.fat.round() as i64,
                target_calories: targets.calories,
            }
        })
        .collect();

    let current = intake_on(today);
    NutritionAnalysis {
        daily_totals,
        today_nutrition: TodayNutrition {
            current,
            target: targets,
        },
        recommendations: recommendations(&current, &targets),
    }
}

/// Advice for today's intake relative to the targets
#[must_use]
pub fn recommendations(current: &Intake, targets: &NutritionTargets) -> Vec<String> {
    let target_calories = targets.calories as f64;
    let mut advice = Vec::new();

    if current.calories < target_calories * 0.8 {
        advice.push(LOW_CALORIES.to_owned());
    } else if current.calories > target_calories * 1.2 {
        advice.push(HIGH_CALORIES.to_owned());
    }

    if current.protein < targets.protein as f64 * 0.8 {
        advice.push(LOW_PROTEIN.to_owned());
    }

    advice
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGETS: NutritionTargets = NutritionTargets {
        calories: 2000,
        protein: 150,
        carbs: 200,
        fat: 67,
    };

    fn day(d: u32, calories: f64, protein: f64) -> DailyIntake {
        DailyIntake {
            date: NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
            calories,
            protein,
            carbs: 10.4,
            fat: 5.6,
        }
    }

    #[test]
    fn test_window_has_every_day_in_order() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let from = today - Duration::days(ANALYSIS_WINDOW_DAYS - 1);
        let analysis = build_analysis(&[day(5, 1200.4, 80.0)], TARGETS, from, today);

        assert_eq!(analysis.daily_totals.len(), 7);
        assert_eq!(analysis.daily_totals[0].date, from);
        assert_eq!(analysis.daily_totals[6].date, today);
        assert_eq!(analysis.daily_totals[1].calories, 1200);
        assert_eq!(analysis.daily_totals[1].carbs, 10);
        assert_eq!(analysis.daily_totals[1].fat, 6);
        assert_eq!(analysis.daily_totals[0].calories, 0);
        assert!(analysis.daily_totals.iter().all(|t| t.target_calories == 2000));
    }

    #[test]
    fn test_empty_today_gets_low_intake_advice() {
        let advice = recommendations(&Intake::default(), &TARGETS);
        assert_eq!(advice, vec![LOW_CALORIES.to_owned(), LOW_PROTEIN.to_owned()]);
    }

    #[test]
    fn test_high_calories_advice() {
        let current = Intake {
            calories: 2500.0,
            protein: 150.0,
            ..Intake::default()
        };
        assert_eq!(recommendations(&current, &TARGETS), vec![HIGH_CALORIES.to_owned()]);
    }

    #[test]
    fn test_on_target_has_no_advice() {
        let current = Intake {
            calories: 2000.0,
            protein: 130.0,
            ..Intake::default()
        };
        assert!(recommendations(&current, &TARGETS).is_empty());
    }
}
