// ABOUTME: Food catalogue and food log persistence
// ABOUTME: Substring food lookup, transactional classification logging and per-day intake sums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, Sqlite, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};

/// A catalogue food with nutrient values per 100 g
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Kilocalories per 100 g
    pub calories: f64,
    /// Protein grams per 100 g
    pub protein: f64,
    /// Carbohydrate grams per 100 g
    pub carbs: f64,
    /// Fat grams per 100 g
    pub fat: f64,
}

/// Nutrient values used when a recorded food is not in the catalogue
pub const PLACEHOLDER_FOOD: (f64, f64, f64, f64) = (100.0, 5.0, 10.0, 2.0);

/// One classified food ready to be logged
#[derive(Debug, Clone, PartialEq)]
pub struct FoodLogInput {
    /// Food name as recognised in the transcript
    pub name: String,
    /// Normalised meal (breakfast, lunch, dinner, snack)
    pub meal: String,
    /// Quantity in grams
    pub grams: f64,
}

/// A food log row created by classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedFood {
    /// Food log row id
    pub id: String,
    /// Catalogue food name
    pub name: String,
    /// Meal the food was logged under
    pub meal: String,
    /// Quantity in grams
    pub grams: f64,
}

/// Summed intake for one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyIntake {
    /// Day
    pub date: NaiveDate,
    /// Kilocalories
    pub calories: f64,
    /// Protein grams
    pub protein: f64,
    /// Carbohydrate grams
    pub carbs: f64,
    /// Fat grams
    pub fat: f64,
}

const FIND_FOOD_SQL: &str =
    "SELECT * FROM food WHERE lower(name) LIKE '%' || lower($1) || '%' ORDER BY length(name) LIMIT 1";

impl Database {
    /// Insert a catalogue food
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_food(&self, food: &Food) -> AppResult<()> {
        insert_food_row(self.pool(), food).await
    }

    /// Find the first catalogue food whose name contains `name`, ignoring case
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_food_by_name(&self, name: &str) -> AppResult<Option<Food>> {
        let row = sqlx::query(FIND_FOOD_SQL)
            .bind(name)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::persistence(format!("Failed to search foods: {e}")))?;

        row.as_ref().map(row_to_food).transpose()
    }

    /// Log classified foods for one day in a single transaction
    ///
    /// Foods missing from the catalogue are added with placeholder nutrient values.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if any statement fails; nothing is written in that case
    pub async fn log_classified_foods(
        &self,
        user_id: &str,
        date: NaiveDate,
        items: &[FoodLogInput],
    ) -> AppResult<Vec<LoggedFood>> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::persistence(format!("Failed to begin transaction: {e}")))?;

        let mut logged = Vec::with_capacity(items.len());
        for item in items {
            let food = find_or_create_food(&mut tx, &item.name).await?;
            let id = Uuid::new_v4().to_string();

            sqlx::query(
                "INSERT INTO food_log (id, user_id, date, meal, food_id, grams) VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&id)
            .bind(user_id)
            .bind(date)
            .bind(&item.meal)
            .bind(&food.id)
            .bind(item.grams)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::persistence(format!("Failed to insert food log: {e}")))?;

            logged.push(LoggedFood {
                id,
                name: food.name,
                meal: item.meal.clone(),
                grams: item.grams,
            });
        }

        tx.commit()
            .await
            .map_err(|e| AppError::persistence(format!("Failed to commit food log: {e}")))?;

        debug!(user_id = %user_id, count = logged.len(), "Logged classified foods");
        Ok(logged)
    }

    /// Sum logged intake per day for `from..=to`; days without entries are omitted
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn daily_intake(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DailyIntake>> {
        let rows = sqlx::query(
            r"
            SELECT fl.date AS date,
                   SUM(fl.grams / 100.0 * f.calories) AS calories,
                   SUM(fl.grams / 100.0 * f.protein) AS protein,
                   SUM(fl.grams / 100.0 * f.carbs) AS carbs,
                   SUM(fl.grams / 100.0 * f.fat) AS fat
            FROM food_log fl
            JOIN food f ON f.id = fl.food_id
            WHERE fl.user_id = $1 AND fl.date >= $2 AND fl.date <= $3
            GROUP BY fl.date
            ORDER BY fl.date
            ",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::persistence(format!("Failed to sum food log: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(DailyIntake {
                    date: row.try_get("date")?,
                    calories: row.try_get("calories")?,
                    protein: row.try_get("protein")?,
                    carbs: row.try_get("carbs")?,
                    fat: row.try_get("fat")?,
                })
            })
            .collect()
    }
}

async fn insert_food_row<'e, E>(executor: E, food: &Food) -> AppResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO food (id, name, calories, protein, carbs, fat) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&food.id)
    .bind(&food.name)
    .bind(food.calories)
    .bind(food.protein)
    .bind(food.carbs)
    .bind(food.fat)
    .execute(executor)
    .await
    .map_err(|e| AppError::persistence(format!("Failed to insert food: {e}")))?;
    Ok(())
}

async fn find_or_create_food(tx: &mut Transaction<'_, Sqlite>, name: &str) -> AppResult<Food> {
    let row = sqlx::query(FIND_FOOD_SQL)
        .bind(name)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to search foods: {e}")))?;

    if let Some(row) = row {
        return row_to_food(&row);
    }

    let (calories, protein, carbs, fat) = PLACEHOLDER_FOOD;
    let food = Food {
        id: Uuid::new_v4().to_string(),
        name: name.to_owned(),
        calories,
        protein,
        carbs,
        fat,
    };
    insert_food_row(&mut **tx, &food).await?;
    debug!(food = %name, "Added unknown food with placeholder nutrients");
    Ok(food)
}

fn row_to_food(row: &SqliteRow) -> AppResult<Food> {
    Ok(Food {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        calories: row.try_get("calories")?,
        protein: row.try_get("protein")?,
        carbs: row.try_get("carbs")?,
        fat: row.try_get("fat")?,
    })
}
