//! Collaborator interfaces the session layer depends on.
//!
//! Persistence, per-set logging, audio/speech feedback, and identity are
//! injected explicitly -- the state machine never reads ambient globals.
//! Implementations live in [`crate::storage`] (SQLite) or in the caller.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::workout::Exercise;

/// One "set completed" record handed to the logging collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLogEntry {
    pub actor: Uuid,
    pub workout_id: Uuid,
    pub exercise_name: String,
    /// 1-based set number within the exercise.
    pub set_number: u32,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

/// Persistence collaborator for workout lifecycle writes.
///
/// Save and cancel are the only user-visible, retryable failures in the
/// session layer; everything else is best-effort.
pub trait ProgressStore {
    /// Persist the resumption cursor and set `status = in_progress`.
    fn save_progress(
        &self,
        workout_id: Uuid,
        exercise_index: usize,
        set_index: usize,
        elapsed_secs: u64,
        exercises: &[Exercise],
    ) -> Result<(), CoreError>;

    /// Set `status = cancelled`.
    fn cancel_workout(&self, workout_id: Uuid) -> Result<(), CoreError>;

    /// Set `status = completed`.
    fn complete_workout(&self, workout_id: Uuid) -> Result<(), CoreError>;

    /// Record the day's XP award. One row per actor per day; retrying for
    /// the same day must be idempotent (upsert).
    fn award_daily_xp(&self, actor: Uuid, day: NaiveDate, xp: u64) -> Result<(), CoreError>;
}

/// Logging collaborator for per-set events. Fire-and-forget from the
/// session's point of view: errors are swallowed by the caller.
pub trait SetLogger {
    fn log_set(&self, entry: &SetLogEntry) -> Result<(), CoreError>;
}

/// Optional audio/speech feedback. All methods are best-effort no-ops by
/// default; failures never block a transition.
pub trait Feedback {
    fn play_tone(&self, _freq_hz: u32, _duration_ms: u32) -> Result<(), CoreError> {
        Ok(())
    }

    fn speak(&self, _text: &str, _locale: &str) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Identity collaborator for the duration tracker and set logging.
pub trait Identity {
    fn current_actor(&self) -> Option<Uuid>;
}

/// Feedback sink that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl Feedback for NullFeedback {}

/// Logger that drops every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl SetLogger for NullLogger {
    fn log_set(&self, _entry: &SetLogEntry) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Identity provider with a fixed actor, for tests and single-user CLIs.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity(pub Uuid);

impl Identity for FixedIdentity {
    fn current_actor(&self) -> Option<Uuid> {
        Some(self.0)
    }
}

/// Identity provider with no actor.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIdentity;

impl Identity for AnonymousIdentity {
    fn current_actor(&self) -> Option<Uuid> {
        None
    }
}
