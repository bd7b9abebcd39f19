use chrono::Utc;
use clap::Subcommand;
use repflow_core::{format_duration, Database, SessionTracker, TrackerStatus};
use uuid::Uuid;

use crate::commands::local_identity;

const TRACKER_KEY: &str = "session_tracker";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start duration tracking
    Start {
        /// Workout to associate the session with
        #[arg(long)]
        workout_id: Option<Uuid>,
    },
    /// Pause duration tracking
    Pause,
    /// Resume duration tracking
    Resume,
    /// End the session and record its duration
    End,
    /// Print elapsed time
    Status,
}

fn load_tracker(db: &Database) -> SessionTracker {
    if let Ok(Some(json)) = db.kv_get(TRACKER_KEY) {
        if let Ok(tracker) = serde_json::from_str::<SessionTracker>(&json) {
            return tracker;
        }
    }
    SessionTracker::new()
}

fn save_tracker(db: &Database, tracker: &SessionTracker) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_set(TRACKER_KEY, &serde_json::to_string(tracker)?)?;
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut tracker = load_tracker(&db);
    let now = Utc::now();

    match action {
        TimerAction::Start { workout_id } => {
            let identity = local_identity(&db)?;
            let event = tracker.start(now, workout_id, &identity, &db)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Pause => {
            let event = tracker.pause(now, &db)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Resume => {
            let event = tracker.resume(now, &db)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::End => {
            let event = tracker.end(now, &db)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Status => {
            let status = tracker.status();
            let elapsed = tracker.elapsed(now);
            println!("{:?}: {}", status, format_duration(elapsed));
            if status == TrackerStatus::Idle {
                eprintln!("no session has been started");
            }
        }
    }

    save_tracker(&db, &tracker)?;
    Ok(())
}
