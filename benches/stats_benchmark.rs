use chrono::{Duration, FixedOffset, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use fitness_tracker::db::Db;
use fitness_tracker::models::{Goals, Workout, WorkoutType};
use fitness_tracker::services::stats::{count_by_type, daily_series, summarize_workouts};
use fitness_tracker::services::SuggestionRules;
use std::hint::black_box;

/// A year of workouts, one per day, cycling through the types.
fn year_of_workouts(user_id: &str) -> Vec<Workout> {
    let start = Utc.with_ymd_and_hms(2025, 10, 20, 7, 0, 0).unwrap();
    (0..365)
        .map(|day| {
            let date = start + Duration::days(day);
            Workout {
                id: format!("w{}", day),
                user_id: user_id.to_string(),
                name: format!("Workout {}", day),
                workout_type: WorkoutType::ALL[day as usize % WorkoutType::ALL.len()],
                exercises: vec![],
                duration: 20 + (day % 40) as u32,
                total_calories: 150.0 + (day % 300) as f64,
                date,
                notes: None,
                created_at: date,
                updated_at: date,
            }
        })
        .collect()
}

fn benchmark_aggregation(c: &mut Criterion) {
    let workouts = year_of_workouts("bench-user");
    let rules = SuggestionRules::default();
    let goals = Goals {
        weekly_workouts: Some(4),
        ..Default::default()
    };

    let mut group = c.benchmark_group("aggregation");

    group.bench_function("summarize_year", |b| {
        b.iter(|| summarize_workouts(black_box(&workouts)))
    });

    group.bench_function("count_and_suggest", |b| {
        b.iter(|| {
            let counts = count_by_type(black_box(&workouts));
            rules.suggest(workouts.len() as u32, &counts, Some(&goals))
        })
    });

    group.finish();
}

fn benchmark_daily_series(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to build runtime");
    let db = Db::in_memory();
    runtime.block_on(async {
        for workout in year_of_workouts("bench-user") {
            db.insert_workout(&workout).await.expect("insert failed");
        }
    });

    let today = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap().date_naive();
    let offset = FixedOffset::east_opt(0).expect("valid offset");

    c.bench_function("daily_series_memory", |b| {
        b.iter(|| {
            runtime
                .block_on(daily_series(&db, "bench-user", black_box(today), offset))
                .expect("series failed")
        })
    });
}

criterion_group!(benches, benchmark_aggregation, benchmark_daily_series);
criterion_main!(benches);
