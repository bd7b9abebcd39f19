//! Progress tracking: XP levels, day streaks, and badge unlocks.

mod badges;
mod level;
mod streak;

pub use badges::{
    badge, evaluate_badges, newly_unlocked, Badge, BadgeCategory, ProgressStats, Rarity, BADGES,
};
pub use level::{calculate_level, LevelInfo, LEVEL_BASE_XP};
pub use streak::{
    calculate_streaks, calculate_streaks_now, format_streak, streak_message, StreakData,
};
