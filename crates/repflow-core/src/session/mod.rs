pub mod flow;
pub mod runner;
pub mod tracker;

pub use flow::{Phase, ProgressBand, SessionFlow, SessionStatus, ENCOURAGEMENTS};
pub use runner::{Collaborators, SessionRunner, WORKOUT_XP};
pub use tracker::{format_duration, SessionStore, SessionTracker, TrackerStatus};
