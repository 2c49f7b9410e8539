// ABOUTME: Daily energy and macronutrient targets from profile anthropometrics
// ABOUTME: Mifflin-St Jeor BMR, activity multipliers and goal-specific macro splits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition Calculator
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>

use pierre_coach_core::models::{
    ActivityLevel, Gender, HeightUnit, TrainingGoal, UserProfile, WeightUnit,
};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453_592;

/// Centimetres per inch
pub const CM_PER_INCH: f64 = 2.54;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Body measurements normalised to metric units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricBody {
    /// Age in years
    pub age: u32,
    /// Height in centimetres
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Gender, if known
    pub gender: Option<Gender>,
}

impl MetricBody {
    /// Convert a profile's stored measurements to metric
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when age, height or weight is missing
    pub fn from_profile(profile: &UserProfile) -> AppResult<Self> {
        let (Some(age), Some(height), Some(weight)) = (profile.age, profile.height, profile.weight)
        else {
            return Err(AppError::bad_request(
                "Incomplete profile. Please update your profile with age, height, and weight",
            ));
        };

        Ok(Self {
            age,
            height_cm: height_to_cm(height, profile.height_unit),
            weight_kg: weight_to_kg(weight, profile.weight_unit),
            gender: profile.gender,
        })
    }
}

/// Convert a stored height to centimetres
#[must_use]
pub fn height_to_cm(height: f64, unit: HeightUnit) -> f64 {
    match unit {
        HeightUnit::Cm => height,
        HeightUnit::In => height * CM_PER_INCH,
    }
}

/// Convert a stored weight to kilograms
#[must_use]
pub fn weight_to_kg(weight: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Kg => weight,
        WeightUnit::Lbs => weight * KG_PER_LB,
    }
}

/// Basal metabolic rate using the Mifflin-St Jeor equation
///
/// `BMR = 10 x weight_kg + 6.25 x height_cm - 5 x age + offset`, where the
/// offset is +5 for men and -161 otherwise.
#[must_use]
pub fn mifflin_st_jeor(body: &MetricBody) -> f64 {
    let offset = if body.gender == Some(Gender::Male) {
        5.0
    } else {
        -161.0
    };
    10.0f64.mul_add(
        body.weight_kg,
        6.25f64.mul_add(body.height_cm, -5.0 * f64::from(body.age)),
    ) + offset
}

/// TDEE multiplier for an activity level
#[must_use]
pub const fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::VeryActive => 1.725,
        ActivityLevel::ExtraActive => 1.9,
    }
}

/// Calorie factor and protein/carb/fat calorie shares for a goal
#[must_use]
pub const fn goal_split(goal: TrainingGoal) -> (f64, f64, f64, f64) {
    match goal {
        TrainingGoal::LoseWeight => (0.8, 0.40, 0.30, 0.30),
        TrainingGoal::GainMuscle => (1.1, 0.30, 0.50, 0.20),
        TrainingGoal::Maintain => (1.0, 0.30, 0.40, 0.30),
    }
}

/// Rounded daily targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTargets {
    /// Kilocalories
    pub calories: i64,
    /// Protein grams
    pub protein: i64,
    /// Carbohydrate grams
    pub carbs: i64,
    /// Fat grams
    pub fat: i64,
}

/// Daily targets for a profile
///
/// # Errors
///
/// Returns `BadRequest` when the profile lacks age, height or weight
pub fn calculate_targets(profile: &UserProfile) -> AppResult<NutritionTargets> {
    let body = MetricBody::from_profile(profile)?;
    let level = profile.activity_level.unwrap_or_default();
    let tdee = mifflin_st_jeor(&body) * activity_multiplier(level);
    Ok(targets_for(tdee, profile.training_goal()))
}

/// Split a TDEE into rounded targets for `goal`
#[must_use]
pub fn targets_for(tdee: f64, goal: TrainingGoal) -> NutritionTargets {
    let (factor, protein_share, carbs_share, fat_share) = goal_split(goal);
    let calories = tdee * factor;
    NutritionTargets {
        calories: calories.round() as i64,
        protein: (calories * protein_share / KCAL_PER_GRAM_PROTEIN).round() as i64,
        carbs: (calories * carbs_share / KCAL_PER_GRAM_CARBS).round() as i64,
        fat: (calories * fat_share / KCAL_PER_GRAM_FAT).round() as i64,
    }
}
