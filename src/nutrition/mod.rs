// ABOUTME: Nutrition analysis and food transcript classification
// ABOUTME: Targets from profile anthropometrics, seven-day intake review and food logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Seven-day intake analysis
pub mod analysis;
/// Energy and macronutrient targets
pub mod calculator;
/// Food transcript classification
pub mod food;

pub use analysis::{analyze_nutrition, NutritionAnalysis};
pub use calculator::{calculate_targets, NutritionTargets};
pub use food::{classify_and_log, ClassificationResult};
