// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Daily nutrition log model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// One meal within a day's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[validate(length(min = 1, message = "Meal name is required"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "calories must not be negative"))]
    pub calories: f64,
    /// Grams
    #[validate(range(min = 0.0, message = "protein must not be negative"))]
    pub protein: f64,
    /// Grams
    #[validate(range(min = 0.0, message = "carbs must not be negative"))]
    pub carbs: f64,
    /// Grams
    #[validate(range(min = 0.0, message = "fats must not be negative"))]
    pub fats: f64,
    #[serde(with = "crate::time_utils::rfc3339_millis")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub time: DateTime<Utc>,
}

/// A user's nutrition log for one calendar day.
///
/// There is at most one entry per (user, date); the document ID is derived
/// from that pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct NutritionEntry {
    /// Document ID: `{user_id}_{date}`
    pub id: String,
    /// Owner
    pub user_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub meals: Vec<Meal>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fats: f64,
    /// Millilitres
    pub water_intake: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "crate::time_utils::rfc3339_millis")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::time_utils::rfc3339_millis")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

impl NutritionEntry {
    /// Document ID for a user's entry on `date`.
    pub fn document_id(user_id: &str, date: NaiveDate) -> String {
        format!("{}_{}", user_id, date.format("%Y-%m-%d"))
    }

    /// Build an entry with totals computed from `meals`.
    pub fn new(
        user_id: &str,
        date: NaiveDate,
        meals: Vec<Meal>,
        water_intake: u32,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut entry = Self {
            id: Self::document_id(user_id, date),
            user_id: user_id.to_string(),
            date,
            meals,
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fats: 0.0,
            water_intake,
            notes,
            created_at: now,
            updated_at: now,
        };
        entry.recompute_totals();
        entry
    }

    /// Reset the four totals to the sums over the current meals.
    pub fn recompute_totals(&mut self) {
        self.total_calories = self.meals.iter().map(|m| m.calories).sum();
        self.total_protein = self.meals.iter().map(|m| m.protein).sum();
        self.total_carbs = self.meals.iter().map(|m| m.carbs).sum();
        self.total_fats = self.meals.iter().map(|m| m.fats).sum();
    }
}
