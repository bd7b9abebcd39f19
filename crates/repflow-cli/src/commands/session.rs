use chrono::Utc;
use clap::Subcommand;
use repflow_core::{
    evaluate_badges, newly_unlocked, Collaborators, Config, Database, Event, NullFeedback,
    SessionFlow, SessionRunner,
};
use uuid::Uuid;

use crate::commands::local_identity;

const FLOW_KEY: &str = "session_flow";

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a guided session for a workout
    Start {
        /// Workout id
        workout_id: Uuid,
    },
    /// Print the current session state as JSON
    Status,
    /// Mark the current set done
    CompleteSet,
    /// Cut the rest countdown short
    SkipRest,
    /// Pause the session
    Pause,
    /// Resume a paused session
    Resume,
    /// Advance session time
    Tick {
        /// Seconds to advance
        #[arg(long, default_value = "1")]
        seconds: u32,
    },
    /// Exit the session
    Quit {
        /// Persist progress for a later resume
        #[arg(long, conflicts_with_all = ["discard", "dismiss"])]
        save: bool,
        /// Cancel the workout
        #[arg(long, conflicts_with = "dismiss")]
        discard: bool,
        /// Close the confirmation and continue
        #[arg(long)]
        dismiss: bool,
    },
}

fn load_flow(db: &Database) -> Result<SessionFlow, Box<dyn std::error::Error>> {
    match db.kv_get(FLOW_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Err("no active session; run `session start <workout-id>` first".into()),
    }
}

fn save_flow(db: &Database, flow: &SessionFlow) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_set(FLOW_KEY, &serde_json::to_string(flow)?)?;
    Ok(())
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}

/// Complete the workout and refresh badge unlocks.
fn finalize(
    db: &Database,
    runner: &mut SessionRunner<'_>,
    actor: Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    runner.finalize()?;
    db.kv_delete(FLOW_KEY)?;

    let stats = db.progress_stats(actor, Utc::now().date_naive())?;
    let current = evaluate_badges(&stats);
    let previous = db.unlocked_badge_ids(actor)?;
    let fresh = newly_unlocked(&previous, &current);
    if !fresh.is_empty() {
        db.mark_badges_unlocked(actor, &fresh, Utc::now())?;
        for id in fresh {
            eprintln!("badge unlocked: {id}");
        }
    }
    Ok(())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let identity = local_identity(&db)?;
    let feedback = NullFeedback;

    if let SessionAction::Start { workout_id } = action {
        if db.kv_get(FLOW_KEY)?.is_some() {
            return Err("a session is already active; quit it first".into());
        }
        let flow = SessionFlow::new(db.get_workout(workout_id)?)?;
        save_flow(&db, &flow)?;
        println!("{}", serde_json::to_string_pretty(&flow.snapshot())?);
        return Ok(());
    }

    let flow = load_flow(&db)?;
    let mut runner = SessionRunner::new(
        flow,
        Collaborators {
            store: &db,
            logger: &db,
            feedback: &feedback,
            identity: &identity,
        },
    )
    .with_locale(config.feedback.speech_locale.clone());

    match action {
        SessionAction::Start { .. } => unreachable!(),
        SessionAction::Status => {
            println!("{}", serde_json::to_string_pretty(&runner.flow().snapshot())?);
        }
        SessionAction::CompleteSet => {
            let events = runner.complete_set();
            print_events(&events)?;
            if runner.flow().is_finished() {
                finalize(&db, &mut runner, identity.0)?;
                return Ok(());
            }
            save_flow(&db, runner.flow())?;
        }
        SessionAction::SkipRest => {
            if let Some(event) = runner.skip_rest() {
                print_events(&[event])?;
            }
            save_flow(&db, runner.flow())?;
        }
        SessionAction::Pause => {
            if let Some(event) = runner.pause() {
                print_events(&[event])?;
            }
            save_flow(&db, runner.flow())?;
        }
        SessionAction::Resume => {
            if let Some(event) = runner.resume() {
                print_events(&[event])?;
            }
            save_flow(&db, runner.flow())?;
        }
        SessionAction::Tick { seconds } => {
            let mut events = Vec::new();
            for _ in 0..seconds {
                events.extend(runner.tick());
            }
            print_events(&events)?;
            println!("{}", serde_json::to_string_pretty(&runner.flow().snapshot())?);
            save_flow(&db, runner.flow())?;
        }
        SessionAction::Quit { save, discard, dismiss } => {
            if dismiss {
                if let Some(event) = runner.dismiss_quit() {
                    print_events(&[event])?;
                }
                save_flow(&db, runner.flow())?;
                return Ok(());
            }
            // Open the confirmation if it is not yet pending.
            runner.request_quit();
            if save {
                let event = runner.save_and_exit()?;
                print_events(&[event])?;
                db.kv_delete(FLOW_KEY)?;
            } else if discard {
                let event = runner.discard_and_exit()?;
                print_events(&[event])?;
                db.kv_delete(FLOW_KEY)?;
            } else {
                // Bare `quit` only opens the confirmation.
                save_flow(&db, runner.flow())?;
                println!("{}", serde_json::to_string_pretty(&runner.flow().snapshot())?);
            }
        }
    }
    Ok(())
}
