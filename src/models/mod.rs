// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod nutrition;
pub mod stats;
pub mod user;
pub mod workout;

pub use nutrition::{Meal, NutritionEntry};
pub use stats::{DailyActivity, NutritionSummary, Suggestion, SuggestionKind, WorkoutSummary};
pub use user::{Goals, User, UserProfile};
pub use workout::{Exercise, Workout, WorkoutType};
