// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily nutrition log routes.

use super::DeleteResponse;
use crate::db::NutritionFilter;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::middleware::security::private_cache;
use crate::models::{Meal, NutritionEntry};
use crate::time_utils::parse_day;
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
use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const DEFAULT_LIMIT: u32 = 30;
const MAX_LIMIT: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/nutrition", get(list_nutrition).post(upsert_nutrition))
        .route("/api/nutrition/{id}", delete(delete_nutrition))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u32>,
}

fn parse_bound(raw: Option<String>, name: &str, offset: FixedOffset) -> Result<Option<NaiveDate>> {
    raw.map(|raw| {
        parse_day(&raw, offset)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid {} '{}'", name, raw)))
    })
    .transpose()
}

impl NutritionQuery {
    fn into_filter(self, offset: FixedOffset) -> Result<NutritionFilter> {
        Ok(NutritionFilter {
            from: parse_bound(self.start_date, "startDate", offset)?,
            to: parse_bound(self.end_date, "endDate", offset)?,
            limit: Some(self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertNutritionRequest {
    pub date: String,
    #[validate(nested)]
    pub meals: Vec<Meal>,
    /// Millilitres
    #[serde(default)]
    pub water_intake: u32,
    pub notes: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct NutritionListResponse {
    pub nutrition_entries: Vec<NutritionEntry>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NutritionResponse {
    pub nutrition: NutritionEntry,
}

/// List the caller's nutrition entries, newest day first.
async fn list_nutrition(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<NutritionQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(params) = query?;
    let filter = params.into_filter(state.config.local_offset)?;

    let nutrition_entries = state.db.find_nutrition(&user.user_id, &filter).await?;

    Ok(private_cache(Json(NutritionListResponse { nutrition_entries })))
}

/// Create or replace the caller's entry for a day. Totals are recomputed
/// from the submitted meals.
async fn upsert_nutrition(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<UpsertNutritionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NutritionResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let date = parse_day(&req.date, state.config.local_offset)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid date '{}'", req.date)))?;

    let entry = NutritionEntry::new(
        &user.user_id,
        date,
        req.meals,
        req.water_intake,
        req.notes,
        Utc::now(),
    );
    let nutrition = state.db.upsert_nutrition(entry).await?;

    tracing::info!(
        user_id = %user.user_id,
        date = %nutrition.date,
        meals = nutrition.meals.len(),
        "Nutrition entry saved"
    );

    Ok((StatusCode::CREATED, Json(NutritionResponse { nutrition })))
}

/// Delete one of the caller's nutrition entries.
async fn delete_nutrition(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.db.delete_nutrition(&user.user_id, &entry_id).await? {
        return Err(AppError::NotFound("Nutrition entry not found".to_string()));
    }

    tracing::info!(user_id = %user.user_id, entry_id = %entry_id, "Nutrition entry deleted");

    Ok(Json(DeleteResponse { success: true }))
}
