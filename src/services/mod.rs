// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod credentials;
pub mod dashboard;
pub mod stats;
pub mod suggestions;

pub use dashboard::Dashboard;
pub use stats::StatsWindow;
pub use suggestions::SuggestionRules;
