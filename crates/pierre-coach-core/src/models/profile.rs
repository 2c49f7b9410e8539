// ABOUTME: User profile model with anthropometrics, activity level and training goal
// ABOUTME: Enum types carry their database string form via as_str/parse
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Biological sex used by the energy expenditure formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Other or undisclosed
    Other,
}

impl Gender {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Unit the stored height value is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeightUnit {
    /// Centimeters
    #[default]
    Cm,
    /// Inches
    In,
}

impl HeightUnit {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cm => "cm",
            Self::In => "in",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cm" => Some(Self::Cm),
            "in" => Some(Self::In),
            _ => None,
        }
    }
}

/// Unit the stored weight value is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    /// Kilograms
    #[default]
    Kg,
    /// Pounds
    Lbs,
}

impl WeightUnit {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lbs => "lbs",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" => Some(Self::Kg),
            "lbs" | "lb" => Some(Self::Lbs),
            _ => None,
        }
    }
}

/// Daily activity level outside of planned training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days a week
    Light,
    /// Moderate exercise 3-5 days a week
    #[default]
    Moderate,
    /// Hard exercise 6-7 days a week
    VeryActive,
    /// Very hard exercise and a physical job
    ExtraActive,
}

impl ActivityLevel {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::VeryActive => "very_active",
            Self::ExtraActive => "extra_active",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Some(Self::Sedentary),
            "light" => Some(Self::Light),
            "moderate" => Some(Self::Moderate),
            "very_active" => Some(Self::VeryActive),
            "extra_active" => Some(Self::ExtraActive),
            _ => None,
        }
    }
}

/// Self-reported training experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    /// New to structured training
    Beginner,
    /// Trains regularly
    Intermediate,
    /// Experienced lifter
    Advanced,
}

impl FitnessLevel {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Training goal driving calorie targets and plan emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainingGoal {
    /// Calorie deficit, higher protein share
    LoseWeight,
    /// Calorie surplus, higher carbohydrate share
    GainMuscle,
    /// Energy balance
    #[default]
    Maintain,
}

impl TrainingGoal {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LoseWeight => "lose_weight",
            Self::GainMuscle => "gain_muscle",
            Self::Maintain => "maintain",
        }
    }

    /// Parse a stored goal, falling back to `Maintain` for free-form text
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "lose_weight" => Self::LoseWeight,
            "gain_muscle" => Self::GainMuscle,
            _ => Self::Maintain,
        }
    }
}

/// One profile row per user; created empty on first access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity-service subject that owns the profile
    pub user_id: String,
    /// Display name
    pub username: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Gender
    pub gender: Option<Gender>,
    /// Height in `height_unit`
    pub height: Option<f64>,
    /// Unit of `height`
    pub height_unit: HeightUnit,
    /// Weight in `weight_unit`
    pub weight: Option<f64>,
    /// Unit of `weight`
    pub weight_unit: WeightUnit,
    /// Daily activity level
    pub activity_level: Option<ActivityLevel>,
    /// Training experience
    pub fitness_level: Option<FitnessLevel>,
    /// Free-form goal; the known values are those of [`TrainingGoal`]
    pub goal: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last explicit save
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// An empty profile for a user seen for the first time
    #[must_use]
    pub fn empty(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            username: None,
            age: None,
            gender: None,
            height: None,
            height_unit: HeightUnit::default(),
            weight: None,
            weight_unit: WeightUnit::default(),
            activity_level: None,
            fitness_level: None,
            goal: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Goal as a known enum value
    #[must_use]
    pub fn training_goal(&self) -> TrainingGoal {
        self.goal
            .as_deref()
            .map_or(TrainingGoal::default(), TrainingGoal::parse_lossy)
    }
}
