// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard assembly.
//!
//! Issues the independent reads for one dashboard concurrently and merges
//! them. The first failing read aborts the whole assembly.

use crate::db::{Db, NutritionFilter, WorkoutFilter};
use crate::error::{AppError, Result};
use crate::models::{
    DailyActivity, NutritionEntry, NutritionSummary, Suggestion, UserProfile, Workout,
    WorkoutSummary,
};
use crate::services::stats::{self, StatsWindow};
use crate::services::suggestions::SuggestionRules;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of recent workouts and nutrition entries shown.
pub const RECENT_LIMIT: u32 = 5;

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardStats {
    pub workout: WorkoutSummary,
    pub nutrition: NutritionSummary,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecentActivity {
    pub workouts: Vec<Workout>,
    pub nutrition: Vec<NutritionEntry>,
}

/// Full dashboard payload.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user_profile: UserProfile,
    pub stats: DashboardStats,
    pub recent_activity: RecentActivity,
    pub chart_data: Vec<DailyActivity>,
    pub suggestions: Vec<Suggestion>,
}

/// Build the dashboard for `user_id` over `window`.
///
/// Returns `NotFound` if the user record no longer exists.
pub async fn assemble(
    db: &Db,
    rules: &SuggestionRules,
    user_id: &str,
    window: &StatsWindow,
) -> Result<Dashboard> {
    let recent_workouts = WorkoutFilter {
        limit: Some(RECENT_LIMIT),
        ..Default::default()
    };
    let recent_nutrition = NutritionFilter {
        limit: Some(RECENT_LIMIT),
        ..Default::default()
    };

    let (user, workout, nutrition, workouts, entries, chart_data, type_counts) = tokio::try_join!(
        db.get_user(user_id),
        stats::workout_summary(db, user_id, window),
        stats::nutrition_summary(db, user_id, window),
        db.find_workouts(user_id, &recent_workouts),
        db.find_nutrition(user_id, &recent_nutrition),
        stats::daily_series(db, user_id, window.today, window.offset),
        stats::workout_type_counts(db, user_id),
    )?;

    let user = user.ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let suggestions = rules.suggest(workout.total_workouts, &type_counts, user.goals.as_ref());

    tracing::debug!(
        user_id,
        days = window.days,
        workouts = workout.total_workouts,
        suggestions = suggestions.len(),
        "Dashboard assembled"
    );

    Ok(Dashboard {
        user_profile: UserProfile::from(user),
        stats: DashboardStats { workout, nutrition },
        recent_activity: RecentActivity {
            workouts,
            nutrition: entries,
        },
        chart_data,
        suggestions,
    })
}
