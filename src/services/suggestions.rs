// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rule-based workout suggestions for the dashboard.
//!
//! A fixed rule table evaluated in priority order. The output depends only
//! on the inputs: same counts and goals, same list.

use crate::models::{Goals, Suggestion, SuggestionKind, WorkoutType};
use std::collections::HashMap;

/// Thresholds for the suggestion rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionRules {
    /// Suggest cardio when it is below this share of workouts.
    pub cardio_share: f64,
    /// Suggest strength when it is below this share of workouts.
    pub strength_share: f64,
    /// Weeks the weekly-workout goal is scaled by when compared with the
    /// window's workout count.
    pub weeks_per_window: u32,
    pub max_suggestions: usize,
}

impl Default for SuggestionRules {
    fn default() -> Self {
        Self {
            cardio_share: 0.3,
            strength_share: 0.3,
            weeks_per_window: 4,
            max_suggestions: 3,
        }
    }
}

impl SuggestionRules {
    /// Build the ordered suggestion list.
    ///
    /// `type_counts` entries of zero are treated the same as absent ones.
    pub fn suggest(
        &self,
        total_workouts: u32,
        type_counts: &HashMap<WorkoutType, u32>,
        goals: Option<&Goals>,
    ) -> Vec<Suggestion> {
        let count = |t: WorkoutType| type_counts.get(&t).copied().unwrap_or(0);
        let below_share = |t: WorkoutType, share: f64| {
            count(t) == 0 || f64::from(count(t)) < f64::from(total_workouts) * share
        };

        let mut suggestions = Vec::new();

        if below_share(WorkoutType::Cardio, self.cardio_share) {
            suggestions.push(suggestion(
                SuggestionKind::Cardio,
                "Add More Cardio",
                "Try running, cycling, or swimming for heart health",
                "Cardio helps improve cardiovascular endurance",
            ));
        }

        if below_share(WorkoutType::Strength, self.strength_share) {
            suggestions.push(suggestion(
                SuggestionKind::Strength,
                "Incorporate Strength Training",
                "Try weightlifting or bodyweight exercises",
                "Strength training builds muscle and boosts metabolism",
            ));
        }

        if count(WorkoutType::Flexibility) == 0 {
            suggestions.push(suggestion(
                SuggestionKind::Flexibility,
                "Try Flexibility Training",
                "Yoga or stretching can improve mobility",
                "Flexibility exercises reduce injury risk",
            ));
        }

        if let Some(weekly) = goals.and_then(|g| g.weekly_workouts).filter(|&w| w > 0) {
            let target = u64::from(weekly) * u64::from(self.weeks_per_window);
            if u64::from(total_workouts) < target {
                suggestions.push(Suggestion {
                    kind: SuggestionKind::Goal,
                    title: "Increase Workout Frequency".to_string(),
                    description: format!("You're targeting {} workouts per week", weekly),
                    reason: "Stay consistent to reach your goals".to_string(),
                });
            }
        }

        suggestions.truncate(self.max_suggestions);
        suggestions
    }
}

fn suggestion(kind: SuggestionKind, title: &str, description: &str, reason: &str) -> Suggestion {
    Suggestion {
        kind,
        title: title.to_string(),
        description: description.to_string(),
        reason: reason.to_string(),
    }
}
