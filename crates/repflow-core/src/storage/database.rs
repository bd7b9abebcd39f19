//! SQLite-based persistence.
//!
//! Provides the storage side of every collaborator interface:
//! - Workout rows with the session resumption cursor
//! - Session duration records
//! - Per-set log entries
//! - Daily XP awards (one row per actor per day)
//! - Unlocked badge sets and a key-value store for application state

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_dir;
use crate::collaborators::{ProgressStore, SetLogEntry, SetLogger};
use crate::error::{CoreError, DatabaseError};
use crate::progress::{calculate_streaks, ProgressStats};
use crate::session::{SessionStore, TrackerStatus};
use crate::workout::{Exercise, Workout, WorkoutStatus};

/// One persisted duration-tracking session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub actor: Uuid,
    pub workout_id: Option<Uuid>,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_secs: Option<u64>,
}

/// SQLite database for workouts, sessions, and progress state.
pub struct Database {
    conn: Connection,
}

fn status_str(status: WorkoutStatus) -> &'static str {
    match status {
        WorkoutStatus::Planned => "planned",
        WorkoutStatus::InProgress => "in_progress",
        WorkoutStatus::Completed => "completed",
        WorkoutStatus::Cancelled => "cancelled",
    }
}

fn parse_status(s: &str) -> WorkoutStatus {
    match s {
        "in_progress" => WorkoutStatus::InProgress,
        "completed" => WorkoutStatus::Completed,
        "cancelled" => WorkoutStatus::Cancelled,
        _ => WorkoutStatus::Planned,
    }
}

fn tracker_status_str(status: TrackerStatus) -> &'static str {
    match status {
        TrackerStatus::Idle => "idle",
        TrackerStatus::Started => "started",
        TrackerStatus::Paused => "paused",
        TrackerStatus::Ended => "ended",
    }
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/repflow/repflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("repflow.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path,
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS workouts (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                status      TEXT NOT NULL,
                date        TEXT NOT NULL,
                current_exercise_index INTEGER NOT NULL DEFAULT 0,
                current_set_index      INTEGER NOT NULL DEFAULT 0,
                duration_seconds       INTEGER NOT NULL DEFAULT 0,
                exercises   TEXT NOT NULL,
                completed_at TEXT
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                actor       TEXT NOT NULL,
                workout_id  TEXT,
                status      TEXT NOT NULL,
                start_time  TEXT NOT NULL,
                end_time    TEXT,
                duration_secs INTEGER
            );

            CREATE TABLE IF NOT EXISTS set_logs (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                actor       TEXT NOT NULL,
                workout_id  TEXT NOT NULL,
                exercise_name TEXT NOT NULL,
                set_number  INTEGER NOT NULL,
                timestamp   TEXT NOT NULL,
                success     INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS daily_progress (
                actor       TEXT NOT NULL,
                day         TEXT NOT NULL,
                xp_earned   INTEGER NOT NULL,
                UNIQUE(actor, day)
            );

            CREATE TABLE IF NOT EXISTS unlocked_badges (
                actor       TEXT NOT NULL,
                badge_id    TEXT NOT NULL,
                unlocked_at TEXT NOT NULL,
                UNIQUE(actor, badge_id)
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_workouts_status ON workouts(status);
            CREATE INDEX IF NOT EXISTS idx_set_logs_workout ON set_logs(workout_id);
            CREATE INDEX IF NOT EXISTS idx_daily_progress_actor ON daily_progress(actor);",
        )?;
        Ok(())
    }

    // ── Workouts ─────────────────────────────────────────────────────

    pub fn insert_workout(&self, workout: &Workout) -> Result<(), CoreError> {
        let exercises = serde_json::to_string(&workout.exercises)?;
        self.conn.execute(
            "INSERT INTO workouts (id, name, status, date, current_exercise_index,
                current_set_index, duration_seconds, exercises)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                workout.id.to_string(),
                workout.name,
                status_str(workout.status),
                workout.date.format("%Y-%m-%d").to_string(),
                workout.current_exercise_index,
                workout.current_set_index,
                workout.duration_seconds,
                exercises,
            ],
        )?;
        Ok(())
    }

    pub fn get_workout(&self, id: Uuid) -> Result<Workout, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, status, date, current_exercise_index, current_set_index,
                    duration_seconds, exercises
             FROM workouts WHERE id = ?1",
        )?;
        let row = stmt
            .query_row(params![id.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, usize>(4)?,
                    row.get::<_, usize>(5)?,
                    row.get::<_, u64>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    CoreError::Database(DatabaseError::NotFound(format!("workout {id}")))
                }
                other => other.into(),
            })?;

        let exercises: Vec<Exercise> = serde_json::from_str(&row.7)?;
        Ok(Workout {
            id: row.0.parse().map_err(|_| {
                CoreError::Database(DatabaseError::QueryFailed("malformed workout id".into()))
            })?,
            name: row.1,
            status: parse_status(&row.2),
            date: row.3.parse().map_err(|_| {
                CoreError::Database(DatabaseError::QueryFailed("malformed workout date".into()))
            })?,
            current_exercise_index: row.4,
            current_set_index: row.5,
            duration_seconds: row.6,
            exercises,
        })
    }

    pub fn list_workouts(&self) -> Result<Vec<Workout>, CoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM workouts ORDER BY date DESC, rowid DESC")?;
        let ids: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<_, _>>()?;
        ids.into_iter()
            .map(|id| {
                let id: Uuid = id.parse().map_err(|_| {
                    CoreError::Database(DatabaseError::QueryFailed("malformed workout id".into()))
                })?;
                self.get_workout(id)
            })
            .collect()
    }

    fn set_workout_status(&self, id: Uuid, status: WorkoutStatus) -> Result<(), CoreError> {
        let changed = self.conn.execute(
            "UPDATE workouts SET status = ?2 WHERE id = ?1",
            params![id.to_string(), status_str(status)],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(format!("workout {id}")).into());
        }
        Ok(())
    }

    // ── Progress queries ─────────────────────────────────────────────

    pub fn total_xp(&self, actor: Uuid) -> Result<u64, CoreError> {
        let xp = self.conn.query_row(
            "SELECT COALESCE(SUM(xp_earned), 0) FROM daily_progress WHERE actor = ?1",
            params![actor.to_string()],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(xp)
    }

    pub fn completed_workout_count(&self) -> Result<u64, CoreError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM workouts WHERE status = 'completed'",
            [],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(count)
    }

    /// Completion timestamps of finished workouts, the streak input.
    pub fn completed_workout_times(&self) -> Result<Vec<DateTime<Utc>>, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT completed_at FROM workouts
             WHERE status = 'completed' AND completed_at IS NOT NULL
             ORDER BY completed_at DESC",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut times = Vec::new();
        for row in rows {
            let raw = row?;
            let parsed = DateTime::parse_from_rfc3339(&raw).map_err(|e| {
                CoreError::Database(DatabaseError::QueryFailed(format!(
                    "malformed completed_at '{raw}': {e}"
                )))
            })?;
            times.push(parsed.with_timezone(&Utc));
        }
        Ok(times)
    }

    /// Assemble the badge-evaluation inputs for an actor.
    pub fn progress_stats(&self, actor: Uuid, today: NaiveDate) -> Result<ProgressStats, CoreError> {
        let times = self.completed_workout_times()?;
        let streaks = calculate_streaks(&times, today);
        Ok(ProgressStats {
            total_xp: self.total_xp(actor)?,
            total_workouts: self.completed_workout_count()?,
            current_streak: streaks.current_streak,
            longest_streak: streaks.longest_streak,
        })
    }

    // ── Badges ───────────────────────────────────────────────────────

    pub fn unlocked_badge_ids(&self, actor: Uuid) -> Result<BTreeSet<String>, CoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT badge_id FROM unlocked_badges WHERE actor = ?1")?;
        let rows = stmt.query_map(params![actor.to_string()], |row| row.get::<_, String>(0))?;
        let mut ids = BTreeSet::new();
        for row in rows {
            ids.insert(row?);
        }
        Ok(ids)
    }

    pub fn mark_badges_unlocked(
        &self,
        actor: Uuid,
        badge_ids: &[&str],
        at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        for id in badge_ids {
            self.conn.execute(
                "INSERT OR IGNORE INTO unlocked_badges (actor, badge_id, unlocked_at)
                 VALUES (?1, ?2, ?3)",
                params![actor.to_string(), id, at.to_rfc3339()],
            )?;
        }
        Ok(())
    }

    // ── Sessions ─────────────────────────────────────────────────────

    pub fn get_session(&self, id: i64) -> Result<SessionRecord, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, actor, workout_id, status, start_time, end_time, duration_secs
             FROM sessions WHERE id = ?1",
        )?;
        let record = stmt.query_row(params![id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<u64>>(6)?,
            ))
        })?;
        Ok(SessionRecord {
            id: record.0,
            actor: record.1.parse().map_err(|_| {
                CoreError::Database(DatabaseError::QueryFailed("malformed actor id".into()))
            })?,
            workout_id: record.2.and_then(|s| s.parse().ok()),
            status: record.3,
            start_time: DateTime::parse_from_rfc3339(&record.4)
                .map_err(|e| {
                    CoreError::Database(DatabaseError::QueryFailed(format!(
                        "malformed start_time: {e}"
                    )))
                })?
                .with_timezone(&Utc),
            end_time: record
                .5
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|t| t.with_timezone(&Utc)),
            duration_secs: record.6,
        })
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), CoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl ProgressStore for Database {
    fn save_progress(
        &self,
        workout_id: Uuid,
        exercise_index: usize,
        set_index: usize,
        elapsed_secs: u64,
        exercises: &[Exercise],
    ) -> Result<(), CoreError> {
        let exercises = serde_json::to_string(exercises)?;
        let changed = self.conn.execute(
            "UPDATE workouts SET status = 'in_progress',
                current_exercise_index = ?2,
                current_set_index = ?3,
                duration_seconds = ?4,
                exercises = ?5
             WHERE id = ?1",
            params![
                workout_id.to_string(),
                exercise_index,
                set_index,
                elapsed_secs,
                exercises,
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(format!("workout {workout_id}")).into());
        }
        Ok(())
    }

    fn cancel_workout(&self, workout_id: Uuid) -> Result<(), CoreError> {
        self.set_workout_status(workout_id, WorkoutStatus::Cancelled)
    }

    fn complete_workout(&self, workout_id: Uuid) -> Result<(), CoreError> {
        let changed = self.conn.execute(
            "UPDATE workouts SET status = 'completed', completed_at = ?2 WHERE id = ?1",
            params![workout_id.to_string(), Utc::now().to_rfc3339()],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(format!("workout {workout_id}")).into());
        }
        Ok(())
    }

    fn award_daily_xp(&self, actor: Uuid, day: NaiveDate, xp: u64) -> Result<(), CoreError> {
        // One award row per actor per day; a retry for the same day is a
        // no-op rather than a double award.
        self.conn.execute(
            "INSERT INTO daily_progress (actor, day, xp_earned) VALUES (?1, ?2, ?3)
             ON CONFLICT(actor, day) DO UPDATE SET xp_earned = excluded.xp_earned",
            params![
                actor.to_string(),
                day.format("%Y-%m-%d").to_string(),
                xp,
            ],
        )?;
        Ok(())
    }
}

impl SetLogger for Database {
    fn log_set(&self, entry: &SetLogEntry) -> Result<(), CoreError> {
        self.conn.execute(
            "INSERT INTO set_logs (actor, workout_id, exercise_name, set_number, timestamp, success)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.actor.to_string(),
                entry.workout_id.to_string(),
                entry.exercise_name,
                entry.set_number,
                entry.timestamp.to_rfc3339(),
                entry.success,
            ],
        )?;
        Ok(())
    }
}

impl SessionStore for Database {
    fn create_session(
        &self,
        actor: Uuid,
        workout_id: Option<Uuid>,
        start_time: DateTime<Utc>,
    ) -> Result<i64, CoreError> {
        self.conn.execute(
            "INSERT INTO sessions (actor, workout_id, status, start_time)
             VALUES (?1, ?2, 'started', ?3)",
            params![
                actor.to_string(),
                workout_id.map(|id| id.to_string()),
                start_time.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_session_status(
        &self,
        session_id: i64,
        status: TrackerStatus,
    ) -> Result<(), CoreError> {
        let changed = self.conn.execute(
            "UPDATE sessions SET status = ?2 WHERE id = ?1",
            params![session_id, tracker_status_str(status)],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(format!("session {session_id}")).into());
        }
        Ok(())
    }

    fn finalize_session(
        &self,
        session_id: i64,
        end_time: DateTime<Utc>,
        duration_secs: u64,
    ) -> Result<(), CoreError> {
        let changed = self.conn.execute(
            "UPDATE sessions SET status = 'ended', end_time = ?2, duration_secs = ?3
             WHERE id = ?1",
            params![session_id, end_time.to_rfc3339(), duration_secs],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(format!("session {session_id}")).into());
        }
        Ok(())
    }
}
