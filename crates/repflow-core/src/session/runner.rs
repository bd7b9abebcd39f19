//! Side-effecting layer over [`SessionFlow`].
//!
//! The runner owns the collaborator handles and interprets flow events:
//! per-set logging and audio/speech are fire-and-forget, while the
//! persistence calls behind save/discard/finalize surface their errors so
//! the user can retry.

use chrono::Utc;

use crate::collaborators::{Feedback, Identity, ProgressStore, SetLogEntry, SetLogger};
use crate::error::{CoreError, InvalidStateError};
use crate::events::Event;
use crate::session::flow::SessionFlow;

/// XP awarded for one completed workout.
pub const WORKOUT_XP: u64 = 100;

/// Set-completion chime (frequency Hz, duration ms).
const TONE_SET_DONE: (u32, u32) = (1318, 120);
/// Rest-over and workout-finished cue.
const TONE_CUE: (u32, u32) = (880, 180);

/// Collaborators injected into a [`SessionRunner`].
pub struct Collaborators<'a> {
    pub store: &'a dyn ProgressStore,
    pub logger: &'a dyn SetLogger,
    pub feedback: &'a dyn Feedback,
    pub identity: &'a dyn Identity,
}

pub struct SessionRunner<'a> {
    flow: SessionFlow,
    collab: Collaborators<'a>,
    speech_locale: String,
}

impl<'a> SessionRunner<'a> {
    pub fn new(flow: SessionFlow, collab: Collaborators<'a>) -> Self {
        Self {
            flow,
            collab,
            speech_locale: "en-US".to_string(),
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.speech_locale = locale.into();
        self
    }

    pub fn flow(&self) -> &SessionFlow {
        &self.flow
    }

    pub fn into_flow(self) -> SessionFlow {
        self.flow
    }

    /// Complete the current set.
    ///
    /// Returns the set-completed event followed by the transition event,
    /// or an empty vec if the flow rejected the call. The log and feedback
    /// side effects never block the transition.
    pub fn complete_set(&mut self) -> Vec<Event> {
        let (exercise_name, set_number) = match self.flow.current_exercise() {
            Some(ex) => (ex.name.clone(), self.flow.set_index() as u32 + 1),
            None => return Vec::new(),
        };
        let Some(transition) = self.flow.complete_set() else {
            return Vec::new();
        };

        let at = Utc::now();
        let _ = self.collab.feedback.play_tone(TONE_SET_DONE.0, TONE_SET_DONE.1);
        let _ = self
            .collab
            .feedback
            .speak(self.flow.encouragement(), &self.speech_locale);
        if let Some(actor) = self.collab.identity.current_actor() {
            let _ = self.collab.logger.log_set(&SetLogEntry {
                actor,
                workout_id: self.flow.workout().id,
                exercise_name: exercise_name.clone(),
                set_number,
                timestamp: at,
                success: true,
            });
        }
        if matches!(transition, Event::WorkoutFinished { .. }) {
            let _ = self.collab.feedback.play_tone(TONE_CUE.0, TONE_CUE.1);
        }

        vec![
            Event::SetCompleted {
                exercise: exercise_name,
                set_number,
                at,
            },
            transition,
        ]
    }

    /// Advance one second of session time.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.flow.tick()?;
        if let Event::RestFinished { encouragement, .. } = &event {
            let _ = self.collab.feedback.play_tone(TONE_CUE.0, TONE_CUE.1);
            let _ = self.collab.feedback.speak(encouragement, &self.speech_locale);
        }
        Some(event)
    }

    pub fn skip_rest(&mut self) -> Option<Event> {
        self.flow.skip_rest()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.flow.pause()
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.flow.resume()
    }

    pub fn request_quit(&mut self) -> Option<Event> {
        self.flow.request_quit()
    }

    pub fn dismiss_quit(&mut self) -> Option<Event> {
        self.flow.dismiss_quit()
    }

    /// Persist the cursor with `status = in_progress` and close the quit
    /// confirmation.
    ///
    /// # Errors
    /// On a store failure the confirmation stays open and in-memory
    /// progress is untouched; the user retries manually.
    pub fn save_and_exit(&mut self) -> Result<Event, CoreError> {
        if !self.flow.is_quit_pending() {
            return Err(InvalidStateError::WrongStatus {
                operation: "save_and_exit".into(),
                status: format!("{:?}", self.flow.status()),
            }
            .into());
        }
        let workout = self.flow.workout();
        self.collab.store.save_progress(
            workout.id,
            self.flow.exercise_index(),
            self.flow.set_index(),
            self.flow.elapsed_secs(),
            &workout.exercises,
        )?;
        Ok(Event::ProgressSaved {
            exercise_index: self.flow.exercise_index(),
            set_index: self.flow.set_index(),
            elapsed_secs: self.flow.elapsed_secs(),
            at: Utc::now(),
        })
    }

    /// Persist `status = cancelled` and close the quit confirmation.
    ///
    /// # Errors
    /// Same retry semantics as [`save_and_exit`](Self::save_and_exit).
    pub fn discard_and_exit(&mut self) -> Result<Event, CoreError> {
        if !self.flow.is_quit_pending() {
            return Err(InvalidStateError::WrongStatus {
                operation: "discard_and_exit".into(),
                status: format!("{:?}", self.flow.status()),
            }
            .into());
        }
        self.collab.store.cancel_workout(self.flow.workout().id)?;
        Ok(Event::WorkoutCancelled { at: Utc::now() })
    }

    /// Persist completion and the daily XP award once the flow has
    /// reached its terminal state. The award upsert is keyed by day, so a
    /// retry for the same day is idempotent.
    pub fn finalize(&mut self) -> Result<(), CoreError> {
        if !self.flow.is_finished() {
            return Err(InvalidStateError::WrongStatus {
                operation: "finalize".into(),
                status: format!("{:?}", self.flow.status()),
            }
            .into());
        }
        let workout = self.flow.workout();
        self.collab.store.complete_workout(workout.id)?;
        if let Some(actor) = self.collab.identity.current_actor() {
            self.collab.store.award_daily_xp(actor, workout.date, WORKOUT_XP)?;
        }
        Ok(())
    }
}
