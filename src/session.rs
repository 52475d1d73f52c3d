//src/session.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::WeightUnit;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Exercise '{0}' is already in the current workout.")]
    DuplicateExercise(String),
    #[error("Exercise '{0}' not found in the current workout.")]
    ExerciseNotFound(String),
    #[error("Invalid set input: {0}")]
    InvalidSetInput(String),
    #[error("Set index {index} is out of range for '{exercise}' ({count} set(s) logged).")]
    IndexOutOfRange {
        exercise: String,
        index: usize,
        count: usize,
    },
    #[error("Cannot finish an empty workout. Add an exercise and log some sets first.")]
    EmptySession,
}

/// One logged repetition-and-weight entry for an exercise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Set {
    pub reps: u32,
    pub weight: f64,
    pub unit: WeightUnit,
    pub timestamp: DateTime<Utc>,
}

/// An exercise being worked in the current session, with its sets in
/// insertion (chronological) order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: Vec<Set>,
}

impl Exercise {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sets: Vec::new(),
        }
    }
}

/// The in-progress, not-yet-finished workout being built.
///
/// `start_time` is set exactly once, when the first exercise lands in an
/// empty session, and cleared together with the exercise list.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub exercises: Vec<Exercise>,
    pub start_time: Option<DateTime<Utc>>,
}

fn validate_set_input(reps: u32, weight: f64) -> Result<(), SessionError> {
    if reps == 0 {
        return Err(SessionError::InvalidSetInput(
            "reps must be greater than zero".to_string(),
        ));
    }
    if weight < 0.0 {
        return Err(SessionError::InvalidSetInput(
            "weight must not be negative".to_string(),
        ));
    }
    Ok(())
}

impl Session {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Exercise names are unique case-insensitively within a session.
    fn find(&mut self, name: &str) -> Option<&mut Exercise> {
        self.exercises
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.exercises
            .iter()
            .any(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Appends a new empty exercise.
    ///
    /// Sets `start_time` if this is the first exercise of the session.
    /// # Errors
    /// `DuplicateExercise` if the name is already present (case-insensitive),
    /// `InvalidSetInput` if the trimmed name is empty.
    pub fn add_exercise(&mut self, name: &str) -> Result<(), SessionError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SessionError::InvalidSetInput(
                "exercise name must not be empty".to_string(),
            ));
        }
        if self.contains(trimmed) {
            return Err(SessionError::DuplicateExercise(trimmed.to_string()));
        }
        if self.exercises.is_empty() {
            self.start_time = Some(Utc::now());
        }
        self.exercises.push(Exercise::new(trimmed));
        Ok(())
    }

    /// Removes the named exercise and all its sets. Removing the last
    /// exercise also clears `start_time`, keeping it absent exactly when
    /// the session is empty.
    /// # Errors
    /// `ExerciseNotFound` if no exercise matches.
    pub fn remove_exercise(&mut self, name: &str) -> Result<(), SessionError> {
        let before = self.exercises.len();
        self.exercises
            .retain(|e| !e.name.eq_ignore_ascii_case(name));
        if self.exercises.len() == before {
            return Err(SessionError::ExerciseNotFound(name.to_string()));
        }
        if self.exercises.is_empty() {
            self.start_time = None;
        }
        Ok(())
    }

    /// Appends a set with the current time to the named exercise.
    /// # Errors
    /// `InvalidSetInput` for zero reps or negative weight,
    /// `ExerciseNotFound` if the exercise does not exist.
    pub fn add_set(
        &mut self,
        name: &str,
        reps: u32,
        weight: f64,
        unit: WeightUnit,
    ) -> Result<(), SessionError> {
        validate_set_input(reps, weight)?;
        let exercise = self
            .find(name)
            .ok_or_else(|| SessionError::ExerciseNotFound(name.to_string()))?;
        exercise.sets.push(Set {
            reps,
            weight,
            unit,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Removes the set at `index` (0-based, current position).
    /// # Errors
    /// `ExerciseNotFound` or `IndexOutOfRange`.
    pub fn remove_set(&mut self, name: &str, index: usize) -> Result<(), SessionError> {
        let exercise = self
            .find(name)
            .ok_or_else(|| SessionError::ExerciseNotFound(name.to_string()))?;
        if index >= exercise.sets.len() {
            return Err(SessionError::IndexOutOfRange {
                exercise: exercise.name.clone(),
                index,
                count: exercise.sets.len(),
            });
        }
        exercise.sets.remove(index);
        Ok(())
    }

    /// Replaces reps/weight/unit of the set at `index` and refreshes its
    /// timestamp.
    /// # Errors
    /// Same validation as [`Session::add_set`], plus `IndexOutOfRange`.
    pub fn edit_set(
        &mut self,
        name: &str,
        index: usize,
        reps: u32,
        weight: f64,
        unit: WeightUnit,
    ) -> Result<(), SessionError> {
        validate_set_input(reps, weight)?;
        let exercise = self
            .find(name)
            .ok_or_else(|| SessionError::ExerciseNotFound(name.to_string()))?;
        let count = exercise.sets.len();
        let exercise_name = exercise.name.clone();
        let set = exercise
            .sets
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange {
                exercise: exercise_name,
                index,
                count,
            })?;
        set.reps = reps;
        set.weight = weight;
        set.unit = unit;
        set.timestamp = Utc::now();
        Ok(())
    }

    /// Empties the session and clears the start time.
    pub fn clear(&mut self) {
        self.exercises.clear();
        self.start_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_time_set_on_first_exercise_only() {
        let mut session = Session::default();
        assert!(session.start_time.is_none());
        session.add_exercise("Squat").unwrap();
        let started = session.start_time.expect("start time set");
        session.add_exercise("Bench Press").unwrap();
        assert_eq!(session.start_time, Some(started));
    }

    #[test]
    fn test_duplicate_exercise_is_case_insensitive() {
        let mut session = Session::default();
        session.add_exercise("Bench Press").unwrap();
        let err = session.add_exercise("bench press").unwrap_err();
        assert_eq!(err, SessionError::DuplicateExercise("bench press".into()));
        assert_eq!(session.exercises.len(), 1);
    }

    #[test]
    fn test_removing_last_exercise_clears_start_time() {
        let mut session = Session::default();
        session.add_exercise("Squat").unwrap();
        session.add_exercise("Bench Press").unwrap();
        session.remove_exercise("Squat").unwrap();
        assert!(session.start_time.is_some());
        session.remove_exercise("Bench Press").unwrap();
        assert!(session.start_time.is_none());
    }

    #[test]
    fn test_add_then_remove_set_round_trips() {
        let mut session = Session::default();
        session.add_exercise("Deadlift").unwrap();
        session
            .add_set("Deadlift", 5, 140.0, WeightUnit::Kg)
            .unwrap();
        let before = session.exercises[0].sets.clone();
        session
            .add_set("Deadlift", 3, 150.0, WeightUnit::Kg)
            .unwrap();
        session.remove_set("Deadlift", 1).unwrap();
        assert_eq!(session.exercises[0].sets, before);
    }

    #[test]
    fn test_invalid_set_input_leaves_state_untouched() {
        let mut session = Session::default();
        session.add_exercise("Row").unwrap();
        assert!(matches!(
            session.add_set("Row", 0, 60.0, WeightUnit::Kg),
            Err(SessionError::InvalidSetInput(_))
        ));
        assert!(matches!(
            session.add_set("Row", 8, -1.0, WeightUnit::Kg),
            Err(SessionError::InvalidSetInput(_))
        ));
        assert!(session.exercises[0].sets.is_empty());
    }

    #[test]
    fn test_edit_set_out_of_range() {
        let mut session = Session::default();
        session.add_exercise("Curl").unwrap();
        let err = session
            .edit_set("Curl", 0, 10, 20.0, WeightUnit::Kg)
            .unwrap_err();
        assert!(matches!(err, SessionError::IndexOutOfRange { index: 0, count: 0, .. }));
    }
}
