use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::flow::{Phase, SessionStatus};

/// Every state change in the system produces an Event.
/// The CLI prints them; the runner interprets them for side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SetCompleted {
        exercise: String,
        /// 1-based set number within the exercise.
        set_number: u32,
        at: DateTime<Utc>,
    },
    RestStarted {
        exercise: String,
        rest_secs: u32,
        at: DateTime<Utc>,
    },
    RestSkipped {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Rest countdown reached zero and the next set began.
    RestFinished {
        exercise: String,
        encouragement: String,
        at: DateTime<Utc>,
    },
    ExerciseAdvanced {
        exercise_index: usize,
        exercise: String,
        at: DateTime<Utc>,
    },
    /// All exercises complete; the session is finished.
    WorkoutFinished {
        total_sets: u32,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// Quit confirmation opened; the session is force-paused.
    QuitRequested {
        at: DateTime<Utc>,
    },
    QuitDismissed {
        at: DateTime<Utc>,
    },
    ProgressSaved {
        exercise_index: usize,
        set_index: usize,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    WorkoutCancelled {
        at: DateTime<Utc>,
    },
    TrackerStarted {
        session_id: i64,
        at: DateTime<Utc>,
    },
    TrackerPaused {
        session_id: i64,
        at: DateTime<Utc>,
    },
    TrackerResumed {
        session_id: i64,
        at: DateTime<Utc>,
    },
    TrackerEnded {
        session_id: i64,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: SessionStatus,
        phase: Phase,
        exercise_index: usize,
        set_index: usize,
        exercise: String,
        rest_remaining_secs: u32,
        elapsed_secs: u64,
        progress_percent: u8,
        at: DateTime<Utc>,
    },
}
