use chrono::Utc;
use clap::Subcommand;
use repflow_core::{calculate_level, format_streak, streak_message, Database, BADGES};
use serde::Serialize;

use crate::commands::local_identity;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Level, XP, streak, and workout totals
    Summary,
    /// All badges with unlock state
    Badges,
}

#[derive(Serialize)]
struct Summary {
    level: u32,
    total_xp: u64,
    xp_to_next: u64,
    level_progress_percent: f64,
    total_workouts: u64,
    current_streak: u32,
    longest_streak: u32,
    streak: String,
    message: String,
}

#[derive(Serialize)]
struct BadgeStatus {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    rarity: repflow_core::Rarity,
    unlocked: bool,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let identity = local_identity(&db)?;
    let stats = db.progress_stats(identity.0, Utc::now().date_naive())?;

    match action {
        StatsAction::Summary => {
            let level = calculate_level(stats.total_xp);
            let summary = Summary {
                level: level.level,
                total_xp: stats.total_xp,
                xp_to_next: level.xp_to_next,
                level_progress_percent: level.progress_percent,
                total_workouts: stats.total_workouts,
                current_streak: stats.current_streak,
                longest_streak: stats.longest_streak,
                streak: format_streak(stats.current_streak),
                message: streak_message(stats.current_streak, stats.longest_streak),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Badges => {
            let statuses: Vec<BadgeStatus> = BADGES
                .iter()
                .map(|badge| BadgeStatus {
                    id: badge.id,
                    name: badge.name,
                    description: badge.description,
                    rarity: badge.rarity,
                    unlocked: badge.is_unlocked(&stats),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&statuses)?);
        }
    }
    Ok(())
}
