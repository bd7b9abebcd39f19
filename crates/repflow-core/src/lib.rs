//! # Repflow Core Library
//!
//! This library provides the core business logic for the Repflow workout
//! tracker. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary, with any future GUI being a thin
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Session Flow**: A pure state machine driving set-by-set progression
//!   through a workout, with the caller invoking `tick()` once per second
//!   to advance rest countdowns
//! - **Session Runner**: Interprets flow transitions against injected
//!   collaborators (persistence, set logging, audio feedback)
//! - **Session Tracker**: Pause-aware wall-clock duration tracking backed
//!   by persisted session rows
//! - **Progress**: Level, streak, and badge calculators over accumulated
//!   training history
//! - **Storage**: SQLite-based persistence and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionFlow`]: Core session state machine
//! - [`SessionRunner`]: Flow plus side effects
//! - [`SessionTracker`]: Duration tracking across invocations
//! - [`Database`]: Workout, session, and progress persistence
//! - [`Config`]: Application configuration management

pub mod collaborators;
pub mod error;
pub mod events;
pub mod progress;
pub mod session;
pub mod storage;
pub mod workout;

pub use collaborators::{
    AnonymousIdentity, Feedback, FixedIdentity, Identity, NullFeedback, NullLogger, ProgressStore,
    SetLogEntry, SetLogger,
};
pub use error::{
    ConfigError, CoreError, DatabaseError, InvalidStateError, Result, ValidationError,
};
pub use events::Event;
pub use progress::{
    badge, calculate_level, calculate_streaks, calculate_streaks_now, evaluate_badges,
    format_streak, newly_unlocked, streak_message, Badge, BadgeCategory, LevelInfo, ProgressStats,
    Rarity, StreakData, BADGES, LEVEL_BASE_XP,
};
pub use session::{
    format_duration, Collaborators, Phase, ProgressBand, SessionFlow, SessionRunner,
    SessionStatus, SessionStore, SessionTracker, TrackerStatus, ENCOURAGEMENTS, WORKOUT_XP,
};
pub use storage::{data_dir, Config, Database, SessionRecord};
pub use workout::{Exercise, Workout, WorkoutStatus, DEFAULT_REST_SECS};
