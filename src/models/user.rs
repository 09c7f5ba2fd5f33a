//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Optional fitness goals set at registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    #[validate(range(min = 0.0, message = "targetWeight must not be negative"))]
    pub target_weight: Option<f64>,
    pub weekly_workouts: Option<u32>,
    #[validate(range(min = 0.0, message = "dailyCalories must not be negative"))]
    pub daily_calories: Option<f64>,
}

/// User record stored in the document store.
///
/// Carries the password hash, so it is never returned from an endpoint;
/// handlers respond with [`UserProfile`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque user ID (also used as document ID)
    pub id: String,
    pub name: String,
    /// Trimmed, lowercased email address
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    pub age: Option<u32>,
    /// Body weight (kg)
    pub weight: Option<f64>,
    /// Height (cm)
    pub height: Option<f64>,
    pub goals: Option<Goals>,
    #[serde(with = "crate::time_utils::rfc3339_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::time_utils::rfc3339_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, without credentials.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goals: Option<Goals>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
            weight: user.weight,
            height: user.height,
            goals: user.goals,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Canonical form used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
