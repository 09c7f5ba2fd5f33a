// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout log routes.

use super::DeleteResponse;
use crate::db::WorkoutFilter;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::middleware::security::private_cache;
use crate::models::workout::exercise_totals;
use crate::models::{Exercise, Workout, WorkoutType};
use crate::time_utils::{parse_instant, parse_instant_end};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Response,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::{FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/workouts/{id}", delete(delete_workout))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub workout_type: Option<String>,
    pub limit: Option<u32>,
}

impl WorkoutsQuery {
    fn into_filter(self, offset: FixedOffset) -> Result<WorkoutFilter> {
        let from = self
            .start_date
            .map(|raw| {
                parse_instant(&raw, offset)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid startDate '{}'", raw)))
            })
            .transpose()?;
        let to = self
            .end_date
            .map(|raw| {
                parse_instant_end(&raw, offset)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid endDate '{}'", raw)))
            })
            .transpose()?;
        let workout_type = self
            .workout_type
            .map(|raw| {
                WorkoutType::parse(&raw)
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown workout type '{}'", raw)))
            })
            .transpose()?;

        Ok(WorkoutFilter {
            from,
            to,
            workout_type,
            limit: Some(self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    #[validate(length(min = 1, message = "Workout name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    #[validate(nested)]
    pub exercises: Vec<Exercise>,
    /// Minutes; derived from the exercises when omitted
    pub duration: Option<u32>,
    /// Derived from the exercises when omitted
    #[validate(range(min = 0.0, message = "totalCalories must not be negative"))]
    pub total_calories: Option<f64>,
    pub date: String,
    pub notes: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutsResponse {
    pub workouts: Vec<Workout>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutResponse {
    pub workout: Workout,
}

/// List the caller's workouts, newest first.
async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<WorkoutsQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(params) = query?;
    let filter = params.into_filter(state.config.local_offset)?;

    let workouts = state.db.find_workouts(&user.user_id, &filter).await?;

    Ok(private_cache(Json(WorkoutsResponse { workouts })))
}

/// Log a workout for the caller.
async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<CreateWorkoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkoutResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let date = parse_instant(&req.date, state.config.local_offset)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid date '{}'", req.date)))?;

    let (derived_duration, derived_calories) = exercise_totals(&req.exercises);
    let now = Utc::now();
    let workout = Workout {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id,
        name: req.name.trim().to_string(),
        workout_type: req.workout_type,
        duration: req.duration.unwrap_or(derived_duration),
        total_calories: req.total_calories.unwrap_or(derived_calories),
        exercises: req.exercises,
        date,
        notes: req.notes,
        created_at: now,
        updated_at: now,
    };

    state.db.insert_workout(&workout).await?;

    tracing::info!(
        user_id = %workout.user_id,
        workout_id = %workout.id,
        workout_type = %workout.workout_type,
        "Workout created"
    );

    Ok((StatusCode::CREATED, Json(WorkoutResponse { workout })))
}

/// Delete one of the caller's workouts.
async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(workout_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.db.delete_workout(&user.user_id, &workout_id).await? {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }

    tracing::info!(user_id = %user.user_id, workout_id = %workout_id, "Workout deleted");

    Ok(Json(DeleteResponse { success: true }))
}
