use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "repflow-cli", version, about = "Repflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Workout management
    Workout {
        #[command(subcommand)]
        action: commands::workout::WorkoutAction,
    },
    /// Guided set-by-set session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Session duration tracking
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Progress statistics and badges
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Workout { action } => commands::workout::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
