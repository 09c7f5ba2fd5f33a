// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and logout routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, expired_session_cookie, session_cookie};
use crate::models::user::normalize_email;
use crate::models::{Goals, User};
use crate::services::credentials::{hash_password, verify_password};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub age: Option<u32>,
    #[validate(range(min = 0.0, message = "weight must not be negative"))]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, message = "height must not be negative"))]
    pub height: Option<f64>,
    #[validate(nested)]
    pub goals: Option<Goals>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Identity returned after a successful register or login.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub success: bool,
    pub user: SessionUser,
}

/// Issue a session for `user`: token in a cookie, identity in the body.
fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let config = &state.config;
    let token = create_jwt(
        &user.id,
        &user.email,
        &config.jwt_signing_key,
        config.session_ttl_days,
    )
    .map_err(|e| AppError::Internal(e.context("JWT creation failed")))?;

    let jar = jar.add(session_cookie(
        token,
        config.session_ttl_days,
        config.secure_cookies(),
    ));

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: SessionUser {
                id: user.id.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
            },
        }),
    ))
}

/// Create an account and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let Json(mut req) = payload?;
    req.name = req.name.trim().to_string();
    req.email = normalize_email(&req.email);
    req.validate()?;

    if state.db.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(&req.password, state.config.bcrypt_cost).await?;
    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: req.name,
        email: req.email,
        password_hash,
        age: req.age,
        weight: req.weight,
        height: req.height,
        goals: req.goals,
        created_at: now,
        updated_at: now,
    };

    // Also conflicts if a concurrent registration claimed the email first.
    state.db.create_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    start_session(&state, jar, &user)
}

/// Verify credentials and start a session.
///
/// Unknown email and wrong password produce the same response.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let email = normalize_email(&req.email);
    let Some(user) = state.db.find_user_by_email(&email).await? else {
        // Pay the same bcrypt cost as a wrong password.
        state.decoy_hash.verify(&req.password).await?;
        tracing::info!("Login failed: unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&req.password, &user.password_hash).await? {
        tracing::info!(user_id = %user.id, "Login failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.id, "User logged in");

    start_session(&state, jar, &user)
}

/// Logout - clears the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let jar = jar.add(expired_session_cookie(state.config.secure_cookies()));
    (StatusCode::NO_CONTENT, jar)
}
