// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (credentials and profile)
//! - Email claims (one document per registered email, for uniqueness)
//! - Workouts
//! - Nutrition entries (one document per user per day)

use crate::db::{collections, NutritionFilter, WorkoutFilter};
use crate::error::AppError;
use crate::models::{NutritionEntry, User, Workout};
use crate::time_utils::format_utc_rfc3339;
use firestore::errors::FirestoreError;
use firestore::{paths_camel_case, FirestoreQueryDirection};
use serde::{Deserialize, Serialize};

/// Maps a normalized email to the user that registered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailClaim {
    user_id: String,
}

fn email_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

fn db_err(e: FirestoreError) -> AppError {
    AppError::Database(e.to_string())
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Create a user, claiming their email first.
    ///
    /// The claim is a Firestore `create`, which fails if the document already
    /// exists, so two registrations for one email cannot both succeed.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let client = &self.client;
        let claim_id = email_doc_id(&user.email);

        let claimed: Result<EmailClaim, FirestoreError> = client
            .fluent()
            .insert()
            .into(collections::USER_EMAILS)
            .document_id(&claim_id)
            .object(&EmailClaim {
                user_id: user.id.clone(),
            })
            .execute()
            .await;

        match claimed {
            Ok(_) => {}
            Err(FirestoreError::DataConflictError(_)) => {
                return Err(AppError::Conflict("User already exists".to_string()));
            }
            Err(e) => return Err(db_err(e)),
        }

        let created: Result<User, FirestoreError> = client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await;

        if let Err(e) = created {
            // Release the claim so the email can be registered again.
            if let Err(cleanup) = client
                .fluent()
                .delete()
                .from(collections::USER_EMAILS)
                .document_id(&claim_id)
                .execute()
                .await
            {
                tracing::error!(error = %cleanup, "Failed to release email claim");
            }
            return Err(db_err(e));
        }

        Ok(())
    }

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(db_err)
    }

    /// Get a user by normalized email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let claim: Option<EmailClaim> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::USER_EMAILS)
            .obj()
            .one(&email_doc_id(email))
            .await
            .map_err(db_err)?;

        match claim {
            Some(claim) => self.get_user(&claim.user_id).await,
            None => Ok(None),
        }
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// Store a new workout.
    pub async fn insert_workout(&self, workout: &Workout) -> Result<(), AppError> {
        let _: Workout = self
            .client
            .fluent()
            .insert()
            .into(collections::WORKOUTS)
            .document_id(&workout.id)
            .object(workout)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn get_workout(&self, workout_id: &str) -> Result<Option<Workout>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::WORKOUTS)
            .obj()
            .one(workout_id)
            .await
            .map_err(db_err)
    }

    /// Get a user's workouts, newest first.
    ///
    /// Dates are stored as fixed-width RFC3339 strings, so range filters on
    /// the string field are chronological.
    pub async fn find_workouts(
        &self,
        user_id: &str,
        filter: &WorkoutFilter,
    ) -> Result<Vec<Workout>, AppError> {
        let user_id = user_id.to_string();
        let from = filter.from.map(format_utc_rfc3339);
        let to = filter.to.map(format_utc_rfc3339);
        let workout_type = filter.workout_type.map(|t| t.as_str());

        let query = self
            .client
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(move |q| {
                q.for_all([
                    q.field("userId").eq(user_id.clone()),
                    from.clone()
                        .and_then(|from| q.field("date").greater_than_or_equal(from)),
                    to.clone().and_then(|to| q.field("date").less_than_or_equal(to)),
                    workout_type.and_then(|t| q.field("type").eq(t)),
                ])
            })
            .order_by([("date", FirestoreQueryDirection::Descending)]);

        let query = match filter.limit {
            Some(limit) => query.limit(limit),
            None => query,
        };

        query.obj().query().await.map_err(db_err)
    }

    /// Delete a workout if it belongs to `user_id`.
    pub async fn delete_workout(&self, user_id: &str, workout_id: &str) -> Result<bool, AppError> {
        match self.get_workout(workout_id).await? {
            Some(workout) if workout.user_id == user_id => {}
            _ => return Ok(false),
        }

        self.client
            .fluent()
            .delete()
            .from(collections::WORKOUTS)
            .document_id(workout_id)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(true)
    }

    // ─── Nutrition Operations ────────────────────────────────────

    async fn get_nutrition(&self, entry_id: &str) -> Result<Option<NutritionEntry>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::NUTRITION)
            .obj()
            .one(entry_id)
            .await
            .map_err(db_err)
    }

    /// Create or overwrite the entry for a user-day.
    ///
    /// The first write for a day is a `create`. Later writes update every
    /// field except `createdAt`, so concurrent first writes cannot replace
    /// the stored creation time.
    pub async fn upsert_nutrition(&self, entry: NutritionEntry) -> Result<NutritionEntry, AppError> {
        let created: Result<NutritionEntry, FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collections::NUTRITION)
            .document_id(&entry.id)
            .object(&entry)
            .execute()
            .await;

        match created {
            Ok(stored) => return Ok(stored),
            Err(FirestoreError::DataConflictError(_)) => {}
            Err(e) => return Err(db_err(e)),
        }

        self.client
            .fluent()
            .update()
            .fields(paths_camel_case!(NutritionEntry::{
                user_id,
                date,
                meals,
                total_calories,
                total_protein,
                total_carbs,
                total_fats,
                water_intake,
                notes,
                updated_at
            }))
            .in_col(collections::NUTRITION)
            .document_id(&entry.id)
            .object(&entry)
            .execute()
            .await
            .map_err(db_err)
    }

    /// Get a user's nutrition entries, newest first.
    pub async fn find_nutrition(
        &self,
        user_id: &str,
        filter: &NutritionFilter,
    ) -> Result<Vec<NutritionEntry>, AppError> {
        let user_id = user_id.to_string();
        let from = filter.from.map(|d| d.format("%Y-%m-%d").to_string());
        let to = filter.to.map(|d| d.format("%Y-%m-%d").to_string());

        let query = self
            .client
            .fluent()
            .select()
            .from(collections::NUTRITION)
            .filter(move |q| {
                q.for_all([
                    q.field("userId").eq(user_id.clone()),
                    from.clone()
                        .and_then(|from| q.field("date").greater_than_or_equal(from)),
                    to.clone().and_then(|to| q.field("date").less_than_or_equal(to)),
                ])
            })
            .order_by([("date", FirestoreQueryDirection::Descending)]);

        let query = match filter.limit {
            Some(limit) => query.limit(limit),
            None => query,
        };

        query.obj().query().await.map_err(db_err)
    }

    /// Delete a nutrition entry if it belongs to `user_id`.
    pub async fn delete_nutrition(&self, user_id: &str, entry_id: &str) -> Result<bool, AppError> {
        match self.get_nutrition(entry_id).await? {
            Some(entry) if entry.user_id == user_id => {}
            _ => return Ok(false),
        }

        self.client
            .fluent()
            .delete()
            .from(collections::NUTRITION)
            .document_id(entry_id)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(true)
    }
}
