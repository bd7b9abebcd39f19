use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use repflow_core::{Config, Database, Exercise, Workout};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Create a workout from exercise specs
    Create {
        /// Workout name
        name: String,
        /// Workout date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Exercise spec "name:weight:reps:sets[:rest_secs]", repeatable
        #[arg(long = "exercise", required = true)]
        exercises: Vec<String>,
    },
    /// List workouts as JSON
    List,
    /// Print one workout as JSON
    Show {
        /// Workout id
        id: Uuid,
    },
}

/// Parse "name:weight:reps:sets[:rest_secs]" into an exercise.
///
/// Rest is clamped to the configured bounds; a missing rest field uses
/// the configured default.
fn parse_exercise(spec: &str, config: &Config) -> Result<Exercise, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() < 4 || parts.len() > 5 {
        return Err(format!("bad exercise spec '{spec}': expected name:weight:reps:sets[:rest_secs]").into());
    }
    let weight: f64 = parts[1].parse().map_err(|_| format!("bad weight in '{spec}'"))?;
    let reps: u32 = parts[2].parse().map_err(|_| format!("bad reps in '{spec}'"))?;
    let sets: u32 = parts[3].parse().map_err(|_| format!("bad sets in '{spec}'"))?;
    let rest = match parts.get(4) {
        Some(raw) => raw.parse().map_err(|_| format!("bad rest in '{spec}'"))?,
        None => config.session.default_rest_secs,
    };
    Ok(Exercise::new(parts[0], weight, reps, sets).with_rest(config.session.clamp_rest(rest)))
}

pub fn run(action: WorkoutAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        WorkoutAction::Create { name, date, exercises } => {
            let config = Config::load()?;
            let exercises = exercises
                .iter()
                .map(|spec| parse_exercise(spec, &config))
                .collect::<Result<Vec<_>, _>>()?;
            let workout = Workout::new(name, date.unwrap_or_else(|| Utc::now().date_naive()), exercises);
            workout.validate()?;
            db.insert_workout(&workout)?;
            println!("{}", serde_json::to_string_pretty(&workout)?);
        }
        WorkoutAction::List => {
            let workouts = db.list_workouts()?;
            println!("{}", serde_json::to_string_pretty(&workouts)?);
        }
        WorkoutAction::Show { id } => {
            let workout = db.get_workout(id)?;
            println!("{}", serde_json::to_string_pretty(&workout)?);
        }
    }
    Ok(())
}
