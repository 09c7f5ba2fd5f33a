//! Database layer.
//!
//! [`Db`] is the single data-access handle. It is built once in `main`,
//! stored in `AppState`, and passed by reference into every service call.
//! Production uses Firestore; local development and tests use the in-memory
//! store, which honors the same contracts.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{NutritionEntry, User, Workout, WorkoutType};
use chrono::{DateTime, NaiveDate, Utc};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email uniqueness claims (keyed by normalized, URL-encoded email)
    pub const USER_EMAILS: &str = "user_emails";
    pub const WORKOUTS: &str = "workouts";
    /// Keyed by `{user_id}_{date}`
    pub const NUTRITION: &str = "nutrition";
}

/// Filter for workout queries. Bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct WorkoutFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub workout_type: Option<WorkoutType>,
    pub limit: Option<u32>,
}

/// Filter for nutrition queries. Bounds are inclusive calendar days.
#[derive(Debug, Clone, Default)]
pub struct NutritionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u32>,
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

/// Data-access handle over one of the supported document stores.
#[derive(Clone)]
pub struct Db {
    backend: Backend,
}

macro_rules! dispatch {
    ($self:ident, $db:ident => $call:expr) => {
        match &$self.backend {
            Backend::Firestore($db) => $call.await,
            Backend::Memory($db) => $call.await,
        }
    };
}

impl Db {
    pub fn firestore(db: FirestoreDb) -> Self {
        Self {
            backend: Backend::Firestore(db),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryDb::default()),
        }
    }

    // ─── Credential Store ────────────────────────────────────────

    /// Create a user. Fails with `Conflict` if the email is already registered.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        dispatch!(self, db => db.create_user(user))
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        dispatch!(self, db => db.get_user(user_id))
    }

    /// Look up a user by normalized email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        dispatch!(self, db => db.find_user_by_email(email))
    }

    // ─── Activity Store: Workouts ────────────────────────────────

    pub async fn insert_workout(&self, workout: &Workout) -> Result<(), AppError> {
        dispatch!(self, db => db.insert_workout(workout))
    }

    /// A user's workouts matching `filter`, newest first.
    pub async fn find_workouts(
        &self,
        user_id: &str,
        filter: &WorkoutFilter,
    ) -> Result<Vec<Workout>, AppError> {
        dispatch!(self, db => db.find_workouts(user_id, filter))
    }

    /// Delete a workout owned by `user_id`.
    ///
    /// Returns `false` without touching storage if the workout does not
    /// exist or belongs to someone else.
    pub async fn delete_workout(&self, user_id: &str, workout_id: &str) -> Result<bool, AppError> {
        dispatch!(self, db => db.delete_workout(user_id, workout_id))
    }

    // ─── Activity Store: Nutrition ───────────────────────────────

    /// Insert or overwrite the entry for `(entry.user_id, entry.date)`.
    ///
    /// An overwrite keeps the original `created_at`. Returns the stored entry.
    pub async fn upsert_nutrition(&self, entry: NutritionEntry) -> Result<NutritionEntry, AppError> {
        dispatch!(self, db => db.upsert_nutrition(entry))
    }

    /// A user's nutrition entries matching `filter`, newest first.
    pub async fn find_nutrition(
        &self,
        user_id: &str,
        filter: &NutritionFilter,
    ) -> Result<Vec<NutritionEntry>, AppError> {
        dispatch!(self, db => db.find_nutrition(user_id, filter))
    }

    /// Delete a nutrition entry owned by `user_id`; same contract as
    /// [`Db::delete_workout`].
    pub async fn delete_nutrition(&self, user_id: &str, entry_id: &str) -> Result<bool, AppError> {
        dispatch!(self, db => db.delete_nutrition(user_id, entry_id))
    }
}
