//! Dashboard statistics payloads.
//!
//! Computed per request from stored workouts and nutrition entries; nothing
//! here is persisted.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Workout totals over the lookback window. All zero when no workouts match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub total_workouts: u32,
    /// Minutes
    pub total_duration: u64,
    pub total_calories_burned: f64,
    pub avg_duration: f64,
    pub avg_calories_burned: f64,
}

/// Per-day nutrition averages over the lookback window. All zero when no
/// entries match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub avg_calories: f64,
    pub avg_protein: f64,
    pub avg_carbs: f64,
    pub avg_fats: f64,
    pub avg_water_intake: f64,
}

/// One point of the 7-day activity chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    /// Display label, e.g. `Oct 19`
    pub date: String,
    pub calories_burned: f64,
    pub calories_consumed: f64,
    /// Minutes
    pub workout_duration: u64,
}

/// Category of a dashboard suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Cardio,
    Strength,
    Flexibility,
    Goal,
}

/// A rule-based recommendation shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub reason: String,
}
