//src/history.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{Exercise, Session};
use crate::units::{self, WeightUnit};

/// How many past sessions a per-exercise history lookup returns.
pub const EXERCISE_HISTORY_LIMIT: usize = 5;

/// A completed workout. Snapshotted from the session at finish time and
/// never mutated afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: String,
    pub date: DateTime<Utc>,
    pub name: String,
    pub exercises: Vec<Exercise>,
    pub duration_minutes: Option<i64>,
}

impl Workout {
    /// Builds the immutable record for a finished session.
    ///
    /// Duration is the elapsed time since the session's start, rounded to
    /// whole minutes, or 0 when the session never recorded a start time.
    #[must_use]
    pub fn from_session(session: &Session, name: Option<&str>, finished_at: DateTime<Utc>) -> Self {
        let duration_minutes = session.start_time.map_or(0, |start| {
            let seconds = (finished_at - start).num_seconds();
            (seconds as f64 / 60.0).round() as i64
        });
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(
                || format!("Workout - {}", finished_at.format("%Y-%m-%d")),
                ToString::to_string,
            );
        Self {
            id: Uuid::new_v4().to_string(),
            date: finished_at,
            name,
            exercises: session.exercises.clone(),
            duration_minutes: Some(duration_minutes),
        }
    }

    /// Total number of sets across all exercises.
    #[must_use]
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Total volume in `unit`, each set converted individually.
    #[must_use]
    pub fn total_volume(&self, unit: WeightUnit) -> f64 {
        self.exercises
            .iter()
            .map(|e| units::total_volume_for_sets(&e.sets, unit))
            .sum()
    }
}

/// Rolling seven-day statistics over the history list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyStats {
    pub workouts: usize,
    pub total_sets: usize,
    pub total_volume: f64,
    pub volume_unit: WeightUnit,
}

/// Aggregates workouts dated within the last seven days.
#[must_use]
pub fn weekly_stats(history: &[Workout], unit: WeightUnit) -> WeeklyStats {
    let cutoff = Utc::now() - Duration::days(7);
    let recent: Vec<&Workout> = history.iter().filter(|w| w.date > cutoff).collect();
    WeeklyStats {
        workouts: recent.len(),
        total_sets: recent.iter().map(|w| w.total_sets()).sum(),
        total_volume: recent.iter().map(|w| w.total_volume(unit)).sum(),
        volume_unit: unit,
    }
}

/// Collects the most recent snapshots of `name` from the history.
///
/// Scans most-recent-first, keeps exercises with at least one set, and
/// caps the result at [`EXERCISE_HISTORY_LIMIT`]. Name matching follows
/// the session's case-insensitive policy.
#[must_use]
pub fn exercise_history(history: &[Workout], name: &str) -> Vec<Exercise> {
    history
        .iter()
        .filter_map(|w| {
            w.exercises
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(name) && !e.sets.is_empty())
        })
        .take(EXERCISE_HISTORY_LIMIT)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Set;

    fn workout_with(date: DateTime<Utc>, name: &str, sets: Vec<(u32, f64)>) -> Workout {
        Workout {
            id: Uuid::new_v4().to_string(),
            date,
            name: "Test".to_string(),
            exercises: vec![Exercise {
                name: name.to_string(),
                sets: sets
                    .into_iter()
                    .map(|(reps, weight)| Set {
                        reps,
                        weight,
                        unit: WeightUnit::Kg,
                        timestamp: date,
                    })
                    .collect(),
            }],
            duration_minutes: Some(45),
        }
    }

    #[test]
    fn test_duration_rounds_to_whole_minutes() {
        let finished = Utc::now();
        let session = Session {
            exercises: vec![Exercise::new("Squat")],
            start_time: Some(finished - Duration::seconds(150)),
        };
        let workout = Workout::from_session(&session, None, finished);
        assert_eq!(workout.duration_minutes, Some(3)); // 2.5 min rounds up
    }

    #[test]
    fn test_default_name_includes_date() {
        let finished = Utc::now();
        let session = Session {
            exercises: vec![Exercise::new("Squat")],
            start_time: Some(finished),
        };
        let workout = Workout::from_session(&session, None, finished);
        assert_eq!(
            workout.name,
            format!("Workout - {}", finished.format("%Y-%m-%d"))
        );
        let named = Workout::from_session(&session, Some("Leg Day"), finished);
        assert_eq!(named.name, "Leg Day");
    }

    #[test]
    fn test_weekly_stats_skips_old_workouts() {
        let now = Utc::now();
        let history = vec![
            workout_with(now - Duration::days(1), "Squat", vec![(5, 100.0), (5, 100.0)]),
            workout_with(now - Duration::days(10), "Squat", vec![(5, 100.0)]),
        ];
        let stats = weekly_stats(&history, WeightUnit::Kg);
        assert_eq!(stats.workouts, 1);
        assert_eq!(stats.total_sets, 2);
        assert!((stats.total_volume - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_exercise_history_caps_and_filters() {
        let now = Utc::now();
        let mut history: Vec<Workout> = (0..8)
            .map(|i| workout_with(now - Duration::days(i), "Bench Press", vec![(8, 60.0)]))
            .collect();
        // Exercise present but with no sets logged; must be skipped.
        history.insert(0, workout_with(now, "Bench Press", vec![]));
        let entries = exercise_history(&history, "bench press");
        assert_eq!(entries.len(), EXERCISE_HISTORY_LIMIT);
        assert!(entries.iter().all(|e| !e.sets.is_empty()));
    }
}
