// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Mirrors the Firestore collections with one `DashMap` per collection.
//! Used for local development (`STORAGE_BACKEND=memory`) and tests.

use crate::db::{NutritionFilter, WorkoutFilter};
use crate::error::AppError;
use crate::models::{NutritionEntry, User, Workout};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Default)]
struct Collections {
    users: DashMap<String, User>,
    /// normalized email -> user ID
    user_emails: DashMap<String, String>,
    workouts: DashMap<String, Workout>,
    nutrition: DashMap<String, NutritionEntry>,
}

/// In-memory database. Clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryDb {
    collections: Arc<Collections>,
}

fn apply_limit<T>(mut items: Vec<T>, limit: Option<u32>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit as usize);
    }
    items
}

impl MemoryDb {
    // ─── User Operations ─────────────────────────────────────────

    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self.collections.user_emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict("User already exists".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
                self.collections.users.insert(user.id.clone(), user.clone());
                Ok(())
            }
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.collections.users.get(user_id).map(|u| u.value().clone()))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user_id = match self.collections.user_emails.get(email) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        self.get_user(&user_id).await
    }

    // ─── Workout Operations ──────────────────────────────────────

    pub async fn insert_workout(&self, workout: &Workout) -> Result<(), AppError> {
        match self.collections.workouts.entry(workout.id.clone()) {
            Entry::Occupied(_) => Err(AppError::Database(format!(
                "Workout {} already exists",
                workout.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(workout.clone());
                Ok(())
            }
        }
    }

    pub async fn find_workouts(
        &self,
        user_id: &str,
        filter: &WorkoutFilter,
    ) -> Result<Vec<Workout>, AppError> {
        let mut workouts: Vec<Workout> = self
            .collections
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id)
            .filter(|w| filter.from.map_or(true, |from| w.date >= from))
            .filter(|w| filter.to.map_or(true, |to| w.date <= to))
            .filter(|w| filter.workout_type.map_or(true, |t| w.workout_type == t))
            .map(|w| w.value().clone())
            .collect();

        workouts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(apply_limit(workouts, filter.limit))
    }

    pub async fn delete_workout(&self, user_id: &str, workout_id: &str) -> Result<bool, AppError> {
        Ok(self
            .collections
            .workouts
            .remove_if(workout_id, |_, w| w.user_id == user_id)
            .is_some())
    }

    // ─── Nutrition Operations ────────────────────────────────────

    pub async fn upsert_nutrition(
        &self,
        mut entry: NutritionEntry,
    ) -> Result<NutritionEntry, AppError> {
        match self.collections.nutrition.entry(entry.id.clone()) {
            Entry::Occupied(mut slot) => {
                entry.created_at = slot.get().created_at;
                slot.insert(entry.clone());
            }
            Entry::Vacant(slot) => {
                slot.insert(entry.clone());
            }
        }
        Ok(entry)
    }

    pub async fn find_nutrition(
        &self,
        user_id: &str,
        filter: &NutritionFilter,
    ) -> Result<Vec<NutritionEntry>, AppError> {
        let mut entries: Vec<NutritionEntry> = self
            .collections
            .nutrition
            .iter()
            .filter(|n| n.user_id == user_id)
            .filter(|n| filter.from.map_or(true, |from| n.date >= from))
            .filter(|n| filter.to.map_or(true, |to| n.date <= to))
            .map(|n| n.value().clone())
            .collect();

        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(apply_limit(entries, filter.limit))
    }

    pub async fn delete_nutrition(&self, user_id: &str, entry_id: &str) -> Result<bool, AppError> {
        Ok(self
            .collections
            .nutrition
            .remove_if(entry_id, |_, n| n.user_id == user_id)
            .is_some())
    }
}
