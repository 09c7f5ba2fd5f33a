// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Start the emulator and set FIRESTORE_EMULATOR_HOST to run them;
//! otherwise each test returns early. IDs are unique per run.

use chrono::{NaiveDate, TimeZone, Utc};
use fitness_tracker::db::{NutritionFilter, WorkoutFilter};
use fitness_tracker::error::AppError;
use fitness_tracker::models::{Meal, NutritionEntry, User, Workout, WorkoutType};

mod common;
use common::test_db;

/// Generate a unique ID for test isolation.
fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// Helper to create a basic test user
fn test_user(id: &str, email: &str) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "$2b$04$notarealhash".to_string(),
        age: Some(30),
        weight: None,
        height: None,
        goals: None,
        created_at: now,
        updated_at: now,
    }
}

fn test_workout(user_id: &str, day: u32, workout_type: WorkoutType) -> Workout {
    let date = Utc.with_ymd_and_hms(2026, 10, day, 18, 0, 0).unwrap();
    Workout {
        id: unique_id("workout"),
        user_id: user_id.to_string(),
        name: format!("Day {}", day),
        workout_type,
        exercises: vec![],
        duration: 30,
        total_calories: 250.0,
        date,
        notes: None,
        created_at: date,
        updated_at: date,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_creation_and_lookup() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_id("user");
    let email = format!("{}@example.com", user_id);

    assert!(db.get_user(&user_id).await.unwrap().is_none());

    db.create_user(&test_user(&user_id, &email)).await.unwrap();

    let fetched = db.get_user(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.email, email);
    assert_eq!(fetched.age, Some(30));

    let by_email = db.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(by_email.id, user_id);

    println!("✓ User created and found by email: {}", user_id);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    require_emulator!();

    let db = test_db().await;
    let email = format!("{}@example.com", unique_id("dup"));

    db.create_user(&test_user(&unique_id("user"), &email))
        .await
        .unwrap();
    let second = unique_id("user");
    let err = db
        .create_user(&test_user(&second, &email))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert!(db.get_user(&second).await.unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKOUT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_workout_queries() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_id("user");

    for (day, workout_type) in [
        (3, WorkoutType::Cardio),
        (7, WorkoutType::Strength),
        (11, WorkoutType::Cardio),
    ] {
        db.insert_workout(&test_workout(&user_id, day, workout_type))
            .await
            .unwrap();
    }

    let all = db
        .find_workouts(&user_id, &WorkoutFilter::default())
        .await
        .unwrap();
    let names: Vec<&str> = all.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Day 11", "Day 7", "Day 3"]);

    let ranged = db
        .find_workouts(
            &user_id,
            &WorkoutFilter {
                from: Some(Utc.with_ymd_and_hms(2026, 10, 5, 0, 0, 0).unwrap()),
                to: Some(Utc.with_ymd_and_hms(2026, 10, 11, 18, 0, 0).unwrap()),
                workout_type: Some(WorkoutType::Cardio),
                limit: Some(10),
            },
        )
        .await
        .unwrap();
    assert_eq!(ranged.len(), 1);
    assert_eq!(ranged[0].name, "Day 11");
}

#[tokio::test]
async fn test_workout_delete_requires_owner() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_id("user");
    let workout = test_workout(&owner, 1, WorkoutType::Sports);
    db.insert_workout(&workout).await.unwrap();

    assert!(!db.delete_workout("someone-else", &workout.id).await.unwrap());
    assert!(db.delete_workout(&owner, &workout.id).await.unwrap());
    assert!(db
        .find_workouts(&owner, &WorkoutFilter::default())
        .await
        .unwrap()
        .is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// NUTRITION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_nutrition_upsert_is_per_day() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_id("user");
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let meal = Meal {
        name: "Oats".to_string(),
        calories: 350.0,
        protein: 12.0,
        carbs: 60.0,
        fats: 6.0,
        time: Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(),
    };

    let first = db
        .upsert_nutrition(NutritionEntry::new(
            &user_id,
            date,
            vec![meal.clone()],
            500,
            None,
            Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 0).unwrap(),
        ))
        .await
        .unwrap();
    let second = db
        .upsert_nutrition(NutritionEntry::new(
            &user_id,
            date,
            vec![meal.clone(), meal],
            900,
            Some("second helping".to_string()),
            Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.created_at, first.created_at);

    let entries = db
        .find_nutrition(
            &user_id,
            &NutritionFilter {
                from: Some(date),
                to: Some(date),
                limit: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].total_calories, 700.0);
    assert_eq!(entries[0].water_intake, 900);

    println!("✓ Nutrition upsert verified for {}", user_id);
}

#[tokio::test]
async fn test_concurrent_first_writes_keep_one_creation_time() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_id("user");
    let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
    let early = Utc.with_ymd_and_hms(2026, 10, 20, 7, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2026, 10, 20, 7, 0, 1).unwrap();

    let (a, b) = tokio::join!(
        db.upsert_nutrition(NutritionEntry::new(&user_id, date, vec![], 100, None, early)),
        db.upsert_nutrition(NutritionEntry::new(&user_id, date, vec![], 200, None, late)),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.id, b.id);
    assert_eq!(a.created_at, b.created_at);

    let later = db
        .upsert_nutrition(NutritionEntry::new(
            &user_id,
            date,
            vec![],
            300,
            None,
            Utc.with_ymd_and_hms(2026, 10, 20, 21, 0, 0).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(later.created_at, a.created_at);
    assert_eq!(later.water_intake, 300);
}
