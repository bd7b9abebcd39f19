//! Wall-clock session duration tracker.
//!
//! Tracks one attempt's timing as a persisted record, independently of the
//! progression state machine. Elapsed time is pause-aware here as well, so
//! the two timers agree: paused time never counts toward the duration.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Started -> (Paused <-> Started) -> Ended
//! ```
//!
//! The tracker is serializable state; the caller passes wall-clock time and
//! the persistence/identity collaborators into each operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collaborators::Identity;
use crate::error::{CoreError, InvalidStateError};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStatus {
    Idle,
    Started,
    Paused,
    Ended,
}

/// Persistence seam for session records.
pub trait SessionStore {
    fn create_session(
        &self,
        actor: Uuid,
        workout_id: Option<Uuid>,
        start_time: DateTime<Utc>,
    ) -> Result<i64, CoreError>;

    fn update_session_status(&self, session_id: i64, status: TrackerStatus)
        -> Result<(), CoreError>;

    /// Record end time and the final duration in whole seconds.
    fn finalize_session(
        &self,
        session_id: i64,
        end_time: DateTime<Utc>,
        duration_secs: u64,
    ) -> Result<(), CoreError>;
}

/// Duration tracker for one workout attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTracker {
    status: TrackerStatus,
    session_id: Option<i64>,
    started_at: Option<DateTime<Utc>>,
    /// Seconds accumulated across completed active stretches.
    active_secs: u64,
    /// Start of the current active stretch; `None` while paused.
    resumed_at: Option<DateTime<Utc>>,
    /// Final duration of the last ended session.
    last_duration_secs: u64,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            status: TrackerStatus::Idle,
            session_id: None,
            started_at: None,
            active_secs: 0,
            resumed_at: None,
            last_duration_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TrackerStatus {
        self.status
    }

    pub fn session_id(&self) -> Option<i64> {
        self.session_id
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Duration of the most recently ended session, if any.
    pub fn last_duration_secs(&self) -> Option<u64> {
        match self.status {
            TrackerStatus::Ended => Some(self.last_duration_secs),
            _ => None,
        }
    }

    /// Active seconds so far; frozen while paused, final once ended.
    pub fn elapsed(&self, now: DateTime<Utc>) -> u64 {
        match self.status {
            TrackerStatus::Idle => 0,
            TrackerStatus::Paused => self.active_secs,
            TrackerStatus::Ended => self.last_duration_secs,
            TrackerStatus::Started => {
                let running = self
                    .resumed_at
                    .map(|since| (now - since).num_seconds().max(0) as u64)
                    .unwrap_or(0);
                self.active_secs + running
            }
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Begin a session. Requires an authenticated actor and no session
    /// already active.
    ///
    /// # Errors
    /// [`InvalidStateError::NotAuthenticated`] without an actor,
    /// [`InvalidStateError::SessionAlreadyActive`] if one is running.
    pub fn start(
        &mut self,
        now: DateTime<Utc>,
        workout_id: Option<Uuid>,
        identity: &dyn Identity,
        store: &dyn SessionStore,
    ) -> Result<Event, CoreError> {
        if self.session_id.is_some() {
            return Err(InvalidStateError::SessionAlreadyActive.into());
        }
        let actor = identity
            .current_actor()
            .ok_or(InvalidStateError::NotAuthenticated)?;
        let session_id = store.create_session(actor, workout_id, now)?;
        self.status = TrackerStatus::Started;
        self.session_id = Some(session_id);
        self.started_at = Some(now);
        self.active_secs = 0;
        self.resumed_at = Some(now);
        Ok(Event::TrackerStarted {
            session_id,
            at: now,
        })
    }

    /// Pause the active session. Status-only persistence; duration stays
    /// derived rather than accumulated in the store, to avoid drift.
    pub fn pause(&mut self, now: DateTime<Utc>, store: &dyn SessionStore) -> Result<Event, CoreError> {
        let session_id = self.require_active()?;
        if self.status != TrackerStatus::Started {
            return Err(InvalidStateError::WrongStatus {
                operation: "pause".into(),
                status: format!("{:?}", self.status),
            }
            .into());
        }
        self.flush_active(now);
        self.status = TrackerStatus::Paused;
        store.update_session_status(session_id, TrackerStatus::Paused)?;
        Ok(Event::TrackerPaused {
            session_id,
            at: now,
        })
    }

    pub fn resume(&mut self, now: DateTime<Utc>, store: &dyn SessionStore) -> Result<Event, CoreError> {
        let session_id = self.require_active()?;
        if self.status != TrackerStatus::Paused {
            return Err(InvalidStateError::WrongStatus {
                operation: "resume".into(),
                status: format!("{:?}", self.status),
            }
            .into());
        }
        self.status = TrackerStatus::Started;
        self.resumed_at = Some(now);
        store.update_session_status(session_id, TrackerStatus::Started)?;
        Ok(Event::TrackerResumed {
            session_id,
            at: now,
        })
    }

    /// Finalize the session: persist end time and duration, clear local
    /// session identity.
    pub fn end(&mut self, now: DateTime<Utc>, store: &dyn SessionStore) -> Result<Event, CoreError> {
        let session_id = self.require_active()?;
        self.flush_active(now);
        let duration_secs = self.active_secs;
        store.finalize_session(session_id, now, duration_secs)?;
        self.status = TrackerStatus::Ended;
        self.session_id = None;
        self.last_duration_secs = duration_secs;
        Ok(Event::TrackerEnded {
            session_id,
            duration_secs,
            at: now,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require_active(&self) -> Result<i64, InvalidStateError> {
        self.session_id.ok_or(InvalidStateError::NoActiveSession)
    }

    fn flush_active(&mut self, now: DateTime<Utc>) {
        if let Some(since) = self.resumed_at.take() {
            self.active_secs += (now - since).num_seconds().max(0) as u64;
        }
    }
}

/// Render seconds as `"{h}h {m}m {s}s"`, omitting leading zero units.
pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
