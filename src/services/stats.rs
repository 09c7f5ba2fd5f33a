// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics aggregation over stored workouts and nutrition entries.
//!
//! The `summarize_*` and [`daily_point`] functions are pure folds over
//! records; the async wrappers fetch the records for a window and fold them.
//! Nothing is written back, and missing data yields zeros rather than errors.

use crate::db::{Db, NutritionFilter, WorkoutFilter};
use crate::error::Result;
use crate::models::{
    DailyActivity, NutritionEntry, NutritionSummary, Workout, WorkoutSummary, WorkoutType,
};
use crate::time_utils::{chart_label, day_bounds, days_before, start_of_day};
use chrono::{FixedOffset, NaiveDate};
use futures_util::future::try_join_all;
use std::collections::HashMap;

/// Default lookback window for summaries.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Number of points in the activity chart, ending today.
pub const CHART_DAYS: u32 = 7;

/// A trailing window of whole calendar days ending with `today`.
#[derive(Debug, Clone, Copy)]
pub struct StatsWindow {
    pub today: NaiveDate,
    pub days: u32,
    pub offset: FixedOffset,
}

impl StatsWindow {
    /// First calendar day inside the window.
    pub fn first_day(&self) -> NaiveDate {
        days_before(self.today, self.days)
    }

    /// Workouts dated from the start of the first day through the end of today.
    pub fn workout_filter(&self) -> WorkoutFilter {
        let (_, end_of_today) = day_bounds(self.today, self.offset);
        WorkoutFilter {
            from: Some(start_of_day(self.first_day(), self.offset)),
            to: Some(end_of_today),
            ..Default::default()
        }
    }

    /// Nutrition entries dated from the first day through today.
    pub fn nutrition_filter(&self) -> NutritionFilter {
        NutritionFilter {
            from: Some(self.first_day()),
            to: Some(self.today),
            limit: None,
        }
    }
}

// ─── Pure aggregation ────────────────────────────────────────

/// Count, totals and means over a set of workouts.
pub fn summarize_workouts(workouts: &[Workout]) -> WorkoutSummary {
    if workouts.is_empty() {
        return WorkoutSummary::default();
    }

    let count = workouts.len();
    let total_duration: u64 = workouts.iter().map(|w| u64::from(w.duration)).sum();
    let total_calories_burned: f64 = workouts.iter().map(|w| w.total_calories).sum();

    WorkoutSummary {
        total_workouts: u32::try_from(count).unwrap_or(u32::MAX),
        total_duration,
        total_calories_burned,
        avg_duration: total_duration as f64 / count as f64,
        avg_calories_burned: total_calories_burned / count as f64,
    }
}

/// Means over a set of daily nutrition entries.
pub fn summarize_nutrition(entries: &[NutritionEntry]) -> NutritionSummary {
    if entries.is_empty() {
        return NutritionSummary::default();
    }

    let n = entries.len() as f64;
    let mean = |f: fn(&NutritionEntry) -> f64| entries.iter().map(f).sum::<f64>() / n;

    NutritionSummary {
        avg_calories: mean(|e| e.total_calories),
        avg_protein: mean(|e| e.total_protein),
        avg_carbs: mean(|e| e.total_carbs),
        avg_fats: mean(|e| e.total_fats),
        avg_water_intake: mean(|e| f64::from(e.water_intake)),
    }
}

/// One chart point from a day's workouts and that day's nutrition entry.
pub fn daily_point(
    date: NaiveDate,
    workouts: &[Workout],
    nutrition: Option<&NutritionEntry>,
) -> DailyActivity {
    DailyActivity {
        date: chart_label(date),
        calories_burned: workouts.iter().map(|w| w.total_calories).sum(),
        calories_consumed: nutrition.map_or(0.0, |n| n.total_calories),
        workout_duration: workouts.iter().map(|w| u64::from(w.duration)).sum(),
    }
}

/// Number of workouts of each type.
pub fn count_by_type(workouts: &[Workout]) -> HashMap<WorkoutType, u32> {
    let mut counts = HashMap::new();
    for workout in workouts {
        *counts.entry(workout.workout_type).or_insert(0) += 1;
    }
    counts
}

/// The `CHART_DAYS` calendar days ending with `today`, oldest first.
pub fn chart_days(today: NaiveDate) -> Vec<NaiveDate> {
    (0..CHART_DAYS)
        .rev()
        .map(|back| days_before(today, back))
        .collect()
}

// ─── Store-backed aggregation ────────────────────────────────

/// Workout summary for a user over `window`.
pub async fn workout_summary(db: &Db, user_id: &str, window: &StatsWindow) -> Result<WorkoutSummary> {
    let workouts = db.find_workouts(user_id, &window.workout_filter()).await?;
    Ok(summarize_workouts(&workouts))
}

/// Nutrition summary for a user over `window`.
pub async fn nutrition_summary(
    db: &Db,
    user_id: &str,
    window: &StatsWindow,
) -> Result<NutritionSummary> {
    let entries = db.find_nutrition(user_id, &window.nutrition_filter()).await?;
    Ok(summarize_nutrition(&entries))
}

/// Workout counts by type across all of a user's workouts.
pub async fn workout_type_counts(db: &Db, user_id: &str) -> Result<HashMap<WorkoutType, u32>> {
    let workouts = db.find_workouts(user_id, &WorkoutFilter::default()).await?;
    Ok(count_by_type(&workouts))
}

/// Seven-point daily series ending today. Each day is queried independently
/// and the days run concurrently.
pub async fn daily_series(
    db: &Db,
    user_id: &str,
    today: NaiveDate,
    offset: FixedOffset,
) -> Result<Vec<DailyActivity>> {
    let days = chart_days(today).into_iter().map(|date| async move {
        let (start, end) = day_bounds(date, offset);
        let workout_filter = WorkoutFilter {
            from: Some(start),
            to: Some(end),
            ..Default::default()
        };
        let nutrition_filter = NutritionFilter {
            from: Some(date),
            to: Some(date),
            limit: Some(1),
        };

        let (workouts, nutrition) = tokio::try_join!(
            db.find_workouts(user_id, &workout_filter),
            db.find_nutrition(user_id, &nutrition_filter),
        )?;

        Ok::<_, crate::error::AppError>(daily_point(date, &workouts, nutrition.first()))
    });

    try_join_all(days).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Meal;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn workout(id: &str, day: u32, duration: u32, calories: f64, workout_type: WorkoutType) -> Workout {
        let date = Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap();
        workout_at(id, date, duration, calories, workout_type)
    }

    fn workout_at(
        id: &str,
        date: DateTime<Utc>,
        duration: u32,
        calories: f64,
        workout_type: WorkoutType,
    ) -> Workout {
        Workout {
            id: id.to_string(),
            user_id: "u1".to_string(),
            name: id.to_string(),
            workout_type,
            exercises: vec![],
            duration,
            total_calories: calories,
            date,
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    fn nutrition(day: u32, calories: f64, water: u32) -> NutritionEntry {
        let date = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
        let meal = Meal {
            name: "Lunch".to_string(),
            calories,
            protein: 30.0,
            carbs: 50.0,
            fats: 10.0,
            time: Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap(),
        };
        NutritionEntry::new("u1", date, vec![meal], water, None, Utc::now())
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn pacific() -> FixedOffset {
        FixedOffset::west_opt(7 * 3600).unwrap()
    }

    /// Local wall-clock time in `offset`, as a UTC instant.
    fn local(offset: FixedOffset, day: u32, h: u32, m: u32, s: u32, ms: i64) -> DateTime<Utc> {
        (offset.with_ymd_and_hms(2026, 10, day, h, m, s).unwrap() + TimeDelta::milliseconds(ms))
            .with_timezone(&Utc)
    }

    #[test]
    fn test_empty_summaries_are_zero() {
        assert_eq!(summarize_workouts(&[]), WorkoutSummary::default());
        assert_eq!(summarize_nutrition(&[]), NutritionSummary::default());

        let json = serde_json::to_value(summarize_workouts(&[])).unwrap();
        assert_eq!(json["totalWorkouts"], 0);
        assert_eq!(json["avgCaloriesBurned"], 0.0);
    }

    #[test]
    fn test_summarize_workouts() {
        let workouts = vec![
            workout("a", 1, 30, 300.0, WorkoutType::Cardio),
            workout("b", 2, 45, 250.0, WorkoutType::Strength),
            workout("c", 3, 15, 50.0, WorkoutType::Flexibility),
        ];

        let summary = summarize_workouts(&workouts);
        assert_eq!(summary.total_workouts, 3);
        assert_eq!(summary.total_duration, 90);
        assert_eq!(summary.total_calories_burned, 600.0);
        assert_eq!(summary.avg_duration, 30.0);
        assert_eq!(summary.avg_calories_burned, 200.0);
    }

    #[test]
    fn test_summarize_nutrition_means() {
        let entries = vec![nutrition(1, 2000.0, 1000), nutrition(2, 1500.0, 2000)];
        let summary = summarize_nutrition(&entries);
        assert_eq!(summary.avg_calories, 1750.0);
        assert_eq!(summary.avg_protein, 30.0);
        assert_eq!(summary.avg_carbs, 50.0);
        assert_eq!(summary.avg_fats, 10.0);
        assert_eq!(summary.avg_water_intake, 1500.0);
    }

    #[test]
    fn test_daily_point_defaults_to_zero() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let point = daily_point(date, &[], None);
        assert_eq!(point.date, "Oct 19");
        assert_eq!(point.calories_burned, 0.0);
        assert_eq!(point.calories_consumed, 0.0);
        assert_eq!(point.workout_duration, 0);
    }

    #[test]
    fn test_count_by_type() {
        let workouts = vec![
            workout("a", 1, 30, 300.0, WorkoutType::Cardio),
            workout("b", 2, 30, 300.0, WorkoutType::Cardio),
            workout("c", 3, 30, 300.0, WorkoutType::Sports),
        ];
        let counts = count_by_type(&workouts);
        assert_eq!(counts.get(&WorkoutType::Cardio), Some(&2));
        assert_eq!(counts.get(&WorkoutType::Sports), Some(&1));
        assert_eq!(counts.get(&WorkoutType::Strength), None);
    }

    #[test]
    fn test_chart_days_end_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 2).unwrap();
        let days = chart_days(today);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2026, 9, 26).unwrap());
        assert_eq!(days[6], today);
    }

    #[tokio::test]
    async fn test_window_excludes_older_workouts() {
        let db = Db::in_memory();
        for w in [
            workout("old", 1, 60, 600.0, WorkoutType::Cardio),
            workout("edge", 9, 20, 100.0, WorkoutType::Cardio),
            workout("recent", 18, 40, 400.0, WorkoutType::Strength),
        ] {
            db.insert_workout(&w).await.unwrap();
        }

        let window = StatsWindow {
            today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            days: 10,
            offset: utc(),
        };
        let summary = workout_summary(&db, "u1", &window).await.unwrap();
        assert_eq!(summary.total_workouts, 2);
        assert_eq!(summary.total_duration, 60);
        assert_eq!(summary.total_calories_burned, 500.0);

        let counts = workout_type_counts(&db, "u1").await.unwrap();
        assert_eq!(counts.get(&WorkoutType::Cardio), Some(&2));
    }

    #[tokio::test]
    async fn test_daily_series_always_seven_points() {
        let db = Db::in_memory();
        db.insert_workout(&workout("a", 19, 30, 300.0, WorkoutType::Cardio))
            .await
            .unwrap();
        db.insert_workout(&workout("b", 19, 15, 120.0, WorkoutType::Strength))
            .await
            .unwrap();
        db.upsert_nutrition(nutrition(17, 1800.0, 500)).await.unwrap();

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let series = daily_series(&db, "u1", today, utc()).await.unwrap();

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, "Oct 13");
        assert_eq!(series[6].date, "Oct 19");
        assert_eq!(series[6].calories_burned, 420.0);
        assert_eq!(series[6].workout_duration, 45);
        assert_eq!(series[6].calories_consumed, 0.0);
        assert_eq!(series[4].calories_consumed, 1800.0);
        assert_eq!(series[4].calories_burned, 0.0);

        let again = daily_series(&db, "u1", today, utc()).await.unwrap();
        assert_eq!(series, again);
    }

    #[tokio::test]
    async fn test_daily_series_splits_at_local_midnight() {
        let db = Db::in_memory();
        let last_ms = local(pacific(), 18, 23, 59, 59, 999);
        let midnight = local(pacific(), 19, 0, 0, 0, 0);
        assert_eq!(midnight - last_ms, TimeDelta::milliseconds(1));

        db.insert_workout(&workout_at("late", last_ms, 10, 111.0, WorkoutType::Cardio))
            .await
            .unwrap();
        db.insert_workout(&workout_at("early", midnight, 20, 222.0, WorkoutType::Cardio))
            .await
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let series = daily_series(&db, "u1", today, pacific()).await.unwrap();

        assert_eq!(series[5].date, "Oct 18");
        assert_eq!(series[5].calories_burned, 111.0);
        assert_eq!(series[5].workout_duration, 10);
        assert_eq!(series[6].date, "Oct 19");
        assert_eq!(series[6].calories_burned, 222.0);
        assert_eq!(series[6].workout_duration, 20);
    }

    #[tokio::test]
    async fn test_window_edges_are_inclusive() {
        let db = Db::in_memory();
        let window = StatsWindow {
            today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            days: 3,
            offset: pacific(),
        };
        assert_eq!(window.first_day(), NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());

        for (id, at, calories) in [
            ("before-start", local(pacific(), 15, 23, 59, 59, 999), 1.0),
            ("at-start", local(pacific(), 16, 0, 0, 0, 0), 10.0),
            ("at-end", local(pacific(), 19, 23, 59, 59, 999), 100.0),
            ("after-end", local(pacific(), 20, 0, 0, 0, 0), 1000.0),
        ] {
            db.insert_workout(&workout_at(id, at, 5, calories, WorkoutType::Other))
                .await
                .unwrap();
        }

        let summary = workout_summary(&db, "u1", &window).await.unwrap();
        assert_eq!(summary.total_workouts, 2);
        assert_eq!(summary.total_calories_burned, 110.0);
    }
}
