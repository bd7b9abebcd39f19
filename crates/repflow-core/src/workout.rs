use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Default rest between sets, in seconds.
pub const DEFAULT_REST_SECS: u32 = 60;

fn default_rest() -> u32 {
    DEFAULT_REST_SECS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

/// One exercise inside a workout. Exercises are an ordered list, not
/// independently identified -- insertion order is performance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    /// Working weight in kilograms.
    pub weight: f64,
    /// Target reps per set.
    pub reps: u32,
    /// Target number of sets. Must be >= 1.
    pub sets: u32,
    /// Rest between sets in seconds.
    #[serde(default = "default_rest")]
    pub rest_secs: u32,
    /// Sets completed so far, carried across save/resume.
    #[serde(default)]
    pub completed_sets: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, weight: f64, reps: u32, sets: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            reps,
            sets,
            rest_secs: DEFAULT_REST_SECS,
            completed_sets: 0,
            notes: None,
        }
    }

    pub fn with_rest(mut self, rest_secs: u32) -> Self {
        self.rest_secs = rest_secs;
        self
    }
}

/// A planned or completed training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub exercises: Vec<Exercise>,
    pub status: WorkoutStatus,
    /// Calendar date the workout is associated with.
    pub date: NaiveDate,
    /// Resumption cursor: exercise the session left off at.
    #[serde(default)]
    pub current_exercise_index: usize,
    /// Resumption cursor: set within that exercise.
    #[serde(default)]
    pub current_set_index: usize,
    /// Cumulative elapsed wall-clock seconds, persisted on pause/exit.
    #[serde(default)]
    pub duration_seconds: u64,
}

impl Workout {
    pub fn new(name: impl Into<String>, date: NaiveDate, exercises: Vec<Exercise>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            exercises,
            status: WorkoutStatus::Planned,
            date,
            current_exercise_index: 0,
            current_set_index: 0,
            duration_seconds: 0,
        }
    }

    /// Check the workout admits a valid session progression.
    ///
    /// A workout with no exercises or a zero sets target must be rejected
    /// before the state machine is constructed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.exercises.is_empty() {
            return Err(ValidationError::NoExercises {
                workout: self.name.clone(),
            });
        }
        for ex in &self.exercises {
            if ex.sets == 0 {
                return Err(ValidationError::ZeroSets {
                    exercise: ex.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Total number of sets across all exercises.
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|ex| ex.sets).sum()
    }

    /// Sets contained in exercises before `exercise_index`.
    pub fn sets_before(&self, exercise_index: usize) -> u32 {
        self.exercises
            .iter()
            .take(exercise_index)
            .map(|ex| ex.sets)
            .sum()
    }
}
