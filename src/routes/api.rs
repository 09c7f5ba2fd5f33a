// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the signed-in user's profile and dashboard.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::middleware::security::private_cache;
use crate::models::UserProfile;
use crate::services::dashboard;
use crate::services::stats::{StatsWindow, DEFAULT_WINDOW_DAYS};
use crate::time_utils::local_date;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Response,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const MAX_WINDOW_DAYS: u32 = 365;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/dashboard", get(get_dashboard))
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(UserProfile::from(profile)))
}

// ─── Dashboard ───────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct DashboardQuery {
    /// Lookback window in days
    days: Option<u32>,
}

fn window_days(requested: Option<u32>) -> Result<u32> {
    match requested.unwrap_or(DEFAULT_WINDOW_DAYS) {
        days @ 1..=MAX_WINDOW_DAYS => Ok(days),
        days => Err(AppError::BadRequest(format!(
            "days must be between 1 and {}, got {}",
            MAX_WINDOW_DAYS, days
        ))),
    }
}

/// Aggregated dashboard for the caller.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(params) = query?;
    let offset = state.config.local_offset;
    let window = StatsWindow {
        today: local_date(chrono::Utc::now(), offset),
        days: window_days(params.days)?,
        offset,
    };

    let dashboard = dashboard::assemble(
        &state.db,
        &state.config.suggestion_rules,
        &user.user_id,
        &window,
    )
    .await?;

    Ok(private_cache(Json(dashboard)))
}
