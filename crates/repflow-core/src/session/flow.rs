//! Session progression state machine.
//!
//! The flow is a pure state machine. It performs no IO - the caller drives
//! it by calling `tick()` once per elapsed second and interprets the
//! returned events (see [`SessionRunner`](crate::session::SessionRunner)
//! for the side-effecting layer).
//!
//! ## State Transitions
//!
//! ```text
//! Working -> (Resting | next exercise | Finished)
//! Resting -> Working        (countdown expiry or skip)
//! any non-terminal -> paused / quit-pending and back
//! ```

use chrono::Utc;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;
use crate::workout::{Exercise, Workout};

/// Phrases spoken between sets, chosen uniformly at random.
pub const ENCOURAGEMENTS: [&str; 6] = [
    "You've got this!",
    "One more set!",
    "Strength and honor!",
    "You're going to make it!",
    "One last push!",
    "No letting up!",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// User is performing a set.
    Working,
    /// Countdown between two sets of the same exercise.
    Resting,
}

/// Summarized session status for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Paused,
    QuitPending,
    Finished,
}

/// Cosmetic three-band progress coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressBand {
    Low,
    Mid,
    High,
}

impl ProgressBand {
    pub fn for_percent(percent: u8) -> Self {
        match percent {
            0..=33 => ProgressBand::Low,
            34..=66 => ProgressBand::Mid,
            _ => ProgressBand::High,
        }
    }
}

/// Core session state machine.
///
/// Walks a user through the exercises and sets of a workout. Cursors never
/// decrease except on resume-from-persisted-state at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFlow {
    workout: Workout,
    exercise_idx: usize,
    set_idx: usize,
    phase: Phase,
    /// Remaining rest seconds; only meaningful while `Resting`.
    rest_remaining: u32,
    paused: bool,
    finished: bool,
    quit_pending: bool,
    /// Frozen while paused, unlike raw wall-clock time.
    elapsed_secs: u64,
    encouragement: String,
}

impl SessionFlow {
    /// Build a flow for the workout, resuming from its persisted cursor.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if the workout has no exercises or a
    /// zero sets target.
    pub fn new(workout: Workout) -> Result<Self, ValidationError> {
        workout.validate()?;
        let exercise_idx = workout.current_exercise_index.min(workout.exercises.len() - 1);
        let set_idx = workout.current_set_index.min(workout.exercises[exercise_idx].sets as usize - 1);
        let elapsed_secs = workout.duration_seconds;
        let rest_remaining = workout.exercises[exercise_idx].rest_secs;
        Ok(Self {
            workout,
            exercise_idx,
            set_idx,
            phase: Phase::Working,
            rest_remaining,
            paused: false,
            finished: false,
            quit_pending: false,
            elapsed_secs,
            encouragement: ENCOURAGEMENTS[0].to_string(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_idx
    }

    pub fn set_index(&self) -> usize {
        self.set_idx
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_quit_pending(&self) -> bool {
        self.quit_pending
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn rest_remaining(&self) -> u32 {
        self.rest_remaining
    }

    pub fn encouragement(&self) -> &str {
        &self.encouragement
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.workout.exercises.get(self.exercise_idx)
    }

    pub fn next_exercise(&self) -> Option<&Exercise> {
        self.workout.exercises.get(self.exercise_idx + 1)
    }

    pub fn status(&self) -> SessionStatus {
        if self.finished {
            SessionStatus::Finished
        } else if self.quit_pending {
            SessionStatus::QuitPending
        } else if self.paused {
            SessionStatus::Paused
        } else {
            SessionStatus::Active
        }
    }

    /// Completed steps over total steps, rounded to a whole percent.
    /// Reading this twice without a transition yields the same value.
    pub fn progress_percent(&self) -> u8 {
        let total = self.workout.total_sets();
        if total == 0 {
            return 0;
        }
        let current = self.workout.sets_before(self.exercise_idx) + self.set_idx as u32 + 1;
        (((current as f64 / total as f64) * 100.0).round() as u8).min(100)
    }

    pub fn progress_band(&self) -> ProgressBand {
        ProgressBand::for_percent(self.progress_percent())
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status(),
            phase: self.phase,
            exercise_index: self.exercise_idx,
            set_index: self.set_idx,
            exercise: self
                .current_exercise()
                .map(|ex| ex.name.clone())
                .unwrap_or_default(),
            rest_remaining_secs: self.rest_remaining,
            elapsed_secs: self.elapsed_secs,
            progress_percent: self.progress_percent(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Mark the current set done.
    ///
    /// Only valid while `Working` and not paused. Enters `Resting` when
    /// sets remain in the exercise, advances to the next exercise when the
    /// target is reached, and finishes the session after the last one.
    pub fn complete_set(&mut self) -> Option<Event> {
        if self.paused || self.finished || self.phase != Phase::Working {
            return None;
        }
        let exercise = &mut self.workout.exercises[self.exercise_idx];
        exercise.completed_sets = (exercise.completed_sets + 1).min(exercise.sets);
        let name = exercise.name.clone();
        let rest_secs = exercise.rest_secs;
        let target = exercise.sets as usize;

        if self.set_idx + 1 < target {
            self.set_idx += 1;
            self.phase = Phase::Resting;
            self.rest_remaining = rest_secs;
            Some(Event::RestStarted {
                exercise: name,
                rest_secs,
                at: Utc::now(),
            })
        } else {
            self.go_to_next_exercise()
        }
    }

    /// Cut the rest countdown short and return to `Working`.
    ///
    /// `rest_remaining` is reset to the exercise's rest duration for
    /// display only; no countdown runs while `Working`.
    pub fn skip_rest(&mut self) -> Option<Event> {
        if self.finished || self.phase != Phase::Resting {
            return None;
        }
        let remaining = self.rest_remaining;
        self.phase = Phase::Working;
        self.rest_remaining = self.current_rest_secs();
        Some(Event::RestSkipped {
            remaining_secs: remaining,
            at: Utc::now(),
        })
    }

    /// Freeze the rest countdown and the elapsed-time counter.
    pub fn pause(&mut self) -> Option<Event> {
        if self.finished || self.paused {
            return None;
        }
        self.paused = true;
        Some(Event::SessionPaused {
            elapsed_secs: self.elapsed_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        // A quit confirmation resumes through `dismiss_quit`.
        if !self.paused || self.quit_pending {
            return None;
        }
        self.paused = false;
        Some(Event::SessionResumed {
            elapsed_secs: self.elapsed_secs,
            at: Utc::now(),
        })
    }

    /// Open the exit confirmation. Forces a pause until the caller either
    /// saves, discards, or dismisses.
    pub fn request_quit(&mut self) -> Option<Event> {
        if self.finished || self.quit_pending {
            return None;
        }
        self.paused = true;
        self.quit_pending = true;
        Some(Event::QuitRequested { at: Utc::now() })
    }

    /// Close the confirmation and return to the prior phase.
    pub fn dismiss_quit(&mut self) -> Option<Event> {
        if !self.quit_pending {
            return None;
        }
        self.quit_pending = false;
        self.paused = false;
        Some(Event::QuitDismissed { at: Utc::now() })
    }

    /// Advance one second of session time. Call once per elapsed second;
    /// a no-op while paused or finished.
    ///
    /// Returns `Some(Event::RestFinished)` when the rest countdown expires.
    pub fn tick(&mut self) -> Option<Event> {
        if self.paused || self.finished {
            return None;
        }
        self.elapsed_secs += 1;
        if self.phase != Phase::Resting {
            return None;
        }
        self.rest_remaining = self.rest_remaining.saturating_sub(1);
        if self.rest_remaining > 0 {
            return None;
        }
        self.phase = Phase::Working;
        self.rest_remaining = self.current_rest_secs();
        self.pick_encouragement();
        Some(Event::RestFinished {
            exercise: self
                .current_exercise()
                .map(|ex| ex.name.clone())
                .unwrap_or_default(),
            encouragement: self.encouragement.clone(),
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn go_to_next_exercise(&mut self) -> Option<Event> {
        if self.exercise_idx + 1 < self.workout.exercises.len() {
            self.exercise_idx += 1;
            self.set_idx = 0;
            self.phase = Phase::Working;
            self.rest_remaining = self.current_rest_secs();
            self.pick_encouragement();
            Some(Event::ExerciseAdvanced {
                exercise_index: self.exercise_idx,
                exercise: self
                    .current_exercise()
                    .map(|ex| ex.name.clone())
                    .unwrap_or_default(),
                at: Utc::now(),
            })
        } else {
            self.finished = true;
            Some(Event::WorkoutFinished {
                total_sets: self.workout.total_sets(),
                elapsed_secs: self.elapsed_secs,
                at: Utc::now(),
            })
        }
    }

    fn current_rest_secs(&self) -> u32 {
        self.current_exercise()
            .map(|ex| ex.rest_secs)
            .unwrap_or(crate::workout::DEFAULT_REST_SECS)
    }

    fn pick_encouragement(&mut self) {
        let mut rng = rand::thread_rng();
        if let Some(phrase) = ENCOURAGEMENTS.choose(&mut rng) {
            self.encouragement = phrase.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::workout::Exercise;

    fn workout(exercises: Vec<Exercise>) -> Workout {
        Workout::new(
            "Test",
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            exercises,
        )
    }

    fn two_exercise_flow() -> SessionFlow {
        SessionFlow::new(workout(vec![
            Exercise::new("Squat", 100.0, 5, 2).with_rest(30),
            Exercise::new("Deadlift", 120.0, 5, 3).with_rest(90),
        ]))
        .unwrap()
    }

    #[test]
    fn rejects_empty_workout() {
        assert!(SessionFlow::new(workout(vec![])).is_err());
    }

    #[test]
    fn complete_set_enters_rest_with_exercise_rest() {
        let mut flow = two_exercise_flow();
        let event = flow.complete_set().unwrap();
        assert!(matches!(event, Event::RestStarted { rest_secs: 30, .. }));
        assert_eq!(flow.phase(), Phase::Resting);
        assert_eq!(flow.set_index(), 1);
        assert_eq!(flow.rest_remaining(), 30);
    }

    #[test]
    fn last_set_advances_exercise_without_rest() {
        let mut flow = two_exercise_flow();
        flow.complete_set();
        flow.skip_rest();
        let event = flow.complete_set().unwrap();
        assert!(matches!(event, Event::ExerciseAdvanced { exercise_index: 1, .. }));
        assert_eq!(flow.phase(), Phase::Working);
        assert_eq!(flow.set_index(), 0);
    }

    #[test]
    fn five_sets_finish_the_two_exercise_workout() {
        // Exercises with sets 2 and 3: exactly 5 completions reach the end.
        let mut flow = two_exercise_flow();
        let mut finished = false;
        for _ in 0..5 {
            assert!(!finished);
            let event = flow.complete_set().expect("set should be completable");
            if matches!(event, Event::WorkoutFinished { .. }) {
                finished = true;
            }
            flow.skip_rest();
        }
        assert!(finished);
        assert!(flow.is_finished());
        assert_eq!(flow.progress_percent(), 100);
        assert!(flow.complete_set().is_none());
    }

    #[test]
    fn single_set_single_exercise_finishes_directly() {
        let mut flow =
            SessionFlow::new(workout(vec![Exercise::new("Squat", 100.0, 5, 1).with_rest(30)]))
                .unwrap();
        let event = flow.complete_set().unwrap();
        assert!(matches!(event, Event::WorkoutFinished { total_sets: 1, .. }));
        assert!(flow.is_finished());
        assert_eq!(flow.phase(), Phase::Working); // Never entered Resting.
    }

    #[test]
    fn rest_countdown_expires_into_working() {
        let mut flow = two_exercise_flow();
        flow.complete_set();
        for _ in 0..29 {
            assert!(flow.tick().is_none());
        }
        assert_eq!(flow.rest_remaining(), 1);
        let event = flow.tick().unwrap();
        assert!(matches!(event, Event::RestFinished { .. }));
        assert_eq!(flow.phase(), Phase::Working);
        // Display value resets to the exercise rest duration.
        assert_eq!(flow.rest_remaining(), 30);
    }

    #[test]
    fn pause_freezes_countdown_and_elapsed() {
        let mut flow = two_exercise_flow();
        flow.complete_set();
        flow.tick();
        let remaining = flow.rest_remaining();
        let elapsed = flow.elapsed_secs();

        flow.pause().unwrap();
        for _ in 0..10 {
            assert!(flow.tick().is_none());
        }
        assert_eq!(flow.rest_remaining(), remaining);
        assert_eq!(flow.elapsed_secs(), elapsed);
        assert!(flow.complete_set().is_none());

        flow.resume().unwrap();
        flow.tick();
        assert_eq!(flow.rest_remaining(), remaining - 1);
        assert_eq!(flow.elapsed_secs(), elapsed + 1);
    }

    #[test]
    fn skip_rest_returns_to_working() {
        let mut flow = two_exercise_flow();
        flow.complete_set();
        flow.tick();
        let event = flow.skip_rest().unwrap();
        assert!(matches!(event, Event::RestSkipped { remaining_secs: 29, .. }));
        assert_eq!(flow.phase(), Phase::Working);
        assert!(flow.skip_rest().is_none());
    }

    #[test]
    fn quit_confirmation_forces_pause_and_dismiss_restores() {
        let mut flow = two_exercise_flow();
        flow.complete_set();
        assert!(flow.request_quit().is_some());
        assert!(flow.is_paused());
        assert!(flow.is_quit_pending());
        // Plain resume must not bypass the confirmation.
        assert!(flow.resume().is_none());
        assert!(flow.tick().is_none());

        flow.dismiss_quit().unwrap();
        assert!(!flow.is_paused());
        assert_eq!(flow.phase(), Phase::Resting);
    }

    #[test]
    fn resumes_from_persisted_cursor() {
        let mut w = workout(vec![
            Exercise::new("Squat", 100.0, 5, 2),
            Exercise::new("Deadlift", 120.0, 5, 3),
        ]);
        w.current_exercise_index = 1;
        w.current_set_index = 2;
        w.duration_seconds = 340;
        let flow = SessionFlow::new(w).unwrap();
        assert_eq!(flow.exercise_index(), 1);
        assert_eq!(flow.set_index(), 2);
        assert_eq!(flow.elapsed_secs(), 340);
    }

    #[test]
    fn progress_percent_is_idempotent_and_monotonic() {
        let mut flow = two_exercise_flow();
        let first = flow.progress_percent();
        assert_eq!(first, flow.progress_percent());
        assert_eq!(first, 20); // 1 of 5 steps.

        flow.complete_set();
        assert_eq!(flow.progress_percent(), 40);
        assert_eq!(flow.progress_band(), ProgressBand::Mid);
    }

    #[test]
    fn progress_bands_are_ordered() {
        assert_eq!(ProgressBand::for_percent(0), ProgressBand::Low);
        assert_eq!(ProgressBand::for_percent(33), ProgressBand::Low);
        assert_eq!(ProgressBand::for_percent(34), ProgressBand::Mid);
        assert_eq!(ProgressBand::for_percent(66), ProgressBand::Mid);
        assert_eq!(ProgressBand::for_percent(67), ProgressBand::High);
        assert_eq!(ProgressBand::for_percent(100), ProgressBand::High);
    }

    #[test]
    fn completed_sets_counters_follow_progression() {
        let mut flow = two_exercise_flow();
        flow.complete_set();
        flow.skip_rest();
        flow.complete_set();
        assert_eq!(flow.workout().exercises[0].completed_sets, 2);
        assert_eq!(flow.workout().exercises[1].completed_sets, 0);
    }
}
