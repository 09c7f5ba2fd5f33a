// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitness tracker: workouts, nutrition and a derived dashboard.
//!
//! This crate provides the backend API: account registration and sessions,
//! workout and nutrition logs, and a dashboard that aggregates both into
//! summaries, a 7-day chart and rule-based suggestions.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::credentials::DecoyHash;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    /// Verified in place of a real hash when a login email is unknown.
    pub decoy_hash: DecoyHash,
}

impl AppState {
    pub fn new(config: Config, db: Db) -> Self {
        let decoy_hash = DecoyHash::new(config.bcrypt_cost);
        Self {
            config,
            db,
            decoy_hash,
        }
    }
}
