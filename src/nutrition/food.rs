// ABOUTME: Food transcript classification through schema-constrained generation
// ABOUTME: Parses quantities to grams, normalises meals and logs the foods in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::database::{FoodLogInput, LoggedFood};
use crate::errors::{AppError, AppResult};
use crate::llm::{OutputSchema, StructuredOutput, StructuredRequest};
use crate::plans::PlanService;

/// Function name the model must call when classifying foods
pub const FOOD_FUNCTION: &str = "classify_food_recordings";

/// Grams assumed when a quantity has no recognisable unit
pub const DEFAULT_PORTION_GRAMS: f64 = 100.0;

const FOOD_SYSTEM_PROMPT: &str = "You are a nutritionist that helps identify food items from \
transcripts. Extract all food items mentioned along with quantities and which meal they're for. \
If meal is not specified, make a reasonable guess based on the food types.";

static AMOUNT: OnceLock<Option<Regex>> = OnceLock::new();
static WORD: OnceLock<Option<Regex>> = OnceLock::new();

/// A number, optionally a fraction such as `1/2`
fn amount_pattern() -> Option<&'static Regex> {
    AMOUNT
        .get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)(?:\s*/\s*(\d+(?:\.\d+)?))?").ok())
        .as_ref()
}

fn word_pattern() -> Option<&'static Regex> {
    WORD.get_or_init(|| Regex::new(r"[a-z]+").ok()).as_ref()
}

fn grams_per_unit(word: &str) -> Option<f64> {
    match word {
        "g" | "gram" | "grams" | "gr" => Some(1.0),
        "cup" | "cups" => Some(240.0),
        "tbsp" | "tablespoon" | "tablespoons" => Some(15.0),
        "tsp" | "teaspoon" | "teaspoons" => Some(5.0),
        "oz" | "ounce" | "ounces" => Some(28.35),
        _ => None,
    }
}

/// Meal a food was eaten at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Anything between meals
    Snack,
}

impl Meal {
    /// Stored name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }

    /// Normalise free text; unknown labels become `Snack`
    ///
    /// Exact names win, then any mention of a snack, then time-of-day words.
    #[must_use]
    pub fn normalize(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        match label.as_str() {
            "breakfast" => return Self::Breakfast,
            "lunch" => return Self::Lunch,
            "dinner" => return Self::Dinner,
            "snack" => return Self::Snack,
            _ => {}
        }
        if label.contains("snack") {
            Self::Snack
        } else if label.contains("breakfast") || label.contains("morning") {
            Self::Breakfast
        } else if label.contains("lunch") || label.contains("midday") {
            Self::Lunch
        } else if label.contains("dinner") || label.contains("supper") || label.contains("evening") {
            Self::Dinner
        } else {
            Self::Snack
        }
    }
}

/// One food the model identified
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassifiedFood {
    /// Food name
    pub name: String,
    /// Free-text quantity, e.g. "2 cups"
    #[serde(default)]
    pub quantity: String,
    /// Free-text meal label
    #[serde(default)]
    pub meal: String,
}

#[derive(Debug, Deserialize)]
struct FoodClassification {
    #[serde(default)]
    foods: Vec<ClassifiedFood>,
}

/// Classification response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Always true on a 200 response
    pub success: bool,
    /// Foods the model identified
    pub identified: usize,
    /// Food log rows written
    pub logged: usize,
    /// Written rows
    pub items: Vec<LoggedFood>,
}

/// Convert a free-text quantity to grams
///
/// The first number (or fraction) is the amount; the first unit word found
/// anywhere in the text picks the conversion: grams, cups (240 g),
/// tablespoons (15 g), teaspoons (5 g) or ounces (28.35 g). Anything else is
/// a 100 g portion.
#[must_use]
pub fn parse_quantity(quantity: &str) -> f64 {
    let lowered = quantity.trim().to_lowercase();
    let Some(captures) = amount_pattern().and_then(|re| re.captures(&lowered)) else {
        return DEFAULT_PORTION_GRAMS;
    };
    let Some(mut amount) = captures.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) else {
        return DEFAULT_PORTION_GRAMS;
    };
    if let Some(denominator) = captures.get(2).and_then(|m| m.as_str().parse::<f64>().ok()) {
        if denominator <= 0.0 {
            return DEFAULT_PORTION_GRAMS;
        }
        amount /= denominator;
    }

    word_pattern()
        .and_then(|re| re.find_iter(&lowered).find_map(|w| grams_per_unit(w.as_str())))
        .map_or(DEFAULT_PORTION_GRAMS, |grams| amount * grams)
}

/// Fixed schema for food classification: `{foods: [{name, quantity, meal}]}`
#[must_use]
pub fn food_schema() -> OutputSchema {
    OutputSchema::new(
        FOOD_FUNCTION,
        "Identify food items, quantities and meals from a transcript",
        json!({
            "type": "object",
            "properties": {
                "foods": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Name of the food item" },
                            "quantity": { "type": "string", "description": "Quantity, e.g. 100g, 1 cup, 2 tbsp" },
                            "meal": {
                                "type": "string",
                                "enum": ["breakfast", "lunch", "dinner", "snack"]
                            }
                        },
                        "required": ["name", "quantity", "meal"]
                    }
                }
            },
            "required": ["foods"]
        }),
    )
}

/// Parse the model's food list
///
/// # Errors
///
/// Returns `GenerationFailed` when no structured payload is present or it does not match the schema
pub fn parse_classification(output: &StructuredOutput) -> AppResult<Vec<ClassifiedFood>> {
    let arguments = output
        .arguments
        .as_deref()
        .ok_or_else(|| AppError::generation_failed("Failed to classify food items"))?;
    let parsed: FoodClassification = serde_json::from_str(arguments).map_err(|e| {
        AppError::generation_failed(format!("Failed to parse food classification: {e}"))
    })?;

    Ok(parsed
        .foods
        .into_iter()
        .filter(|food| !food.name.trim().is_empty())
        .collect())
}

/// Classify a transcript and log the recognised foods for `date`
///
/// # Errors
///
/// Returns `UpstreamFailure` or `GenerationFailed` from the classification call
/// and `PersistenceFailure` from the log insert; nothing is written on error
#[instrument(skip(service, transcript), fields(transcript_len = transcript.len()))]
pub async fn classify_and_log(
    service: &PlanService,
    user_id: &str,
    transcript: &str,
    date: NaiveDate,
) -> AppResult<ClassificationResult> {
    let request = StructuredRequest::new(FOOD_SYSTEM_PROMPT, transcript, food_schema());
    let output = service.generate_structured(&request).await?;
    let foods = parse_classification(&output)?;
    if foods.is_empty() {
        warn!("No foods identified in transcript");
    }

    let inputs: Vec<FoodLogInput> = foods
        .iter()
        .map(|food| FoodLogInput {
            name: food.name.trim().to_owned(),
            meal: Meal::normalize(&food.meal).as_str().to_owned(),
            grams: parse_quantity(&food.quantity),
        })
        .collect();

    let items = service
        .database()
        .log_classified_foods(user_id, date, &inputs)
        .await?;

    info!(identified = foods.len(), logged = items.len(), "Food recordings classified");
    Ok(ClassificationResult {
        success: true,
        identified: foods.len(),
        logged: items.len(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_units() {
        assert!((parse_quantity("150g") - 150.0).abs() < 1e-9);
        assert!((parse_quantity("1.5 cups") - 360.0).abs() < 1e-9);
        assert!((parse_quantity("2 tbsp") - 30.0).abs() < 1e-9);
        assert!((parse_quantity("3 Teaspoons") - 15.0).abs() < 1e-9);
        assert!((parse_quantity("4 oz") - 113.4).abs() < 1e-9);
    }

    #[test]
    fn test_parse_quantity_fractions_and_descriptors() {
        assert!((parse_quantity("1/2 cup") - 120.0).abs() < 1e-9);
        assert!((parse_quantity("1 large cup") - 240.0).abs() < 1e-9);
        assert!((parse_quantity("about 2 heaped tablespoons") - 30.0).abs() < 1e-9);
        assert!((parse_quantity("1/0 cup") - DEFAULT_PORTION_GRAMS).abs() < 1e-9);
    }

    #[test]
    fn test_parse_quantity_defaults() {
        assert!((parse_quantity("a handful") - DEFAULT_PORTION_GRAMS).abs() < 1e-9);
        assert!((parse_quantity("2 eggs") - DEFAULT_PORTION_GRAMS).abs() < 1e-9);
        assert!((parse_quantity("") - DEFAULT_PORTION_GRAMS).abs() < 1e-9);
    }

    #[test]
    fn test_meal_normalization() {
        assert_eq!(Meal::normalize("Breakfast"), Meal::Breakfast);
        assert_eq!(Meal::normalize(" LUNCH "), Meal::Lunch);
        assert_eq!(Meal::normalize("supper"), Meal::Dinner);
        assert_eq!(Meal::normalize("afternoon bite"), Meal::Snack);
        assert_eq!(Meal::normalize("Morning Snack"), Meal::Snack);
        assert_eq!(Meal::normalize("evening snack"), Meal::Snack);
        assert_eq!(Meal::normalize("morning"), Meal::Breakfast);
        assert_eq!(Meal::normalize("late dinner"), Meal::Dinner);
        assert_eq!(Meal::normalize(""), Meal::Snack);
    }

    #[test]
    fn test_parse_classification() {
        let output = StructuredOutput::from_arguments(
            r#"{"foods":[{"name":"Oatmeal","quantity":"1 cup","meal":"breakfast"},{"name":"  ","quantity":"1","meal":"snack"}]}"#,
        );
        let foods = parse_classification(&output).unwrap();
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].name, "Oatmeal");
    }

    #[test]
    fn test_missing_arguments_is_generation_failure() {
        let err = parse_classification(&StructuredOutput::from_content("oatmeal")).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::GenerationFailed);
    }
}
