//! Badge catalog and unlock evaluation.
//!
//! Badges are evaluated in a single pure pass over the user's stats.
//! "Which badges just unlocked" is the set difference against the
//! previously persisted unlocked set, never inferred from UI state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    /// Threshold on total XP.
    Xp,
    /// Threshold on completed workouts.
    Workouts,
    /// Threshold on the live streak.
    Streak,
    /// Threshold on the longest streak ever held.
    Special,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: BadgeCategory,
    pub requirement: u64,
    pub rarity: Rarity,
}

/// Inputs to badge evaluation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_xp: u64,
    pub total_workouts: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

pub const BADGES: [Badge; 17] = [
    Badge { id: "first-100", name: "First Steps", description: "Earn your first 100 XP", category: BadgeCategory::Xp, requirement: 100, rarity: Rarity::Common },
    Badge { id: "xp-500", name: "Motivated", description: "Reach 500 XP", category: BadgeCategory::Xp, requirement: 500, rarity: Rarity::Common },
    Badge { id: "xp-1000", name: "Determined", description: "Reach 1000 XP", category: BadgeCategory::Xp, requirement: 1000, rarity: Rarity::Rare },
    Badge { id: "xp-2500", name: "Persistent", description: "Reach 2500 XP", category: BadgeCategory::Xp, requirement: 2500, rarity: Rarity::Rare },
    Badge { id: "xp-5000", name: "Veteran", description: "Reach 5000 XP", category: BadgeCategory::Xp, requirement: 5000, rarity: Rarity::Epic },
    Badge { id: "xp-10000", name: "Legend", description: "Reach 10000 XP", category: BadgeCategory::Xp, requirement: 10000, rarity: Rarity::Legendary },
    Badge { id: "first-workout", name: "Beginner", description: "Complete your first workout", category: BadgeCategory::Workouts, requirement: 1, rarity: Rarity::Common },
    Badge { id: "workouts-10", name: "Regular", description: "Complete 10 workouts", category: BadgeCategory::Workouts, requirement: 10, rarity: Rarity::Common },
    Badge { id: "workouts-25", name: "Consistent", description: "Complete 25 workouts", category: BadgeCategory::Workouts, requirement: 25, rarity: Rarity::Rare },
    Badge { id: "workouts-50", name: "Devoted", description: "Complete 50 workouts", category: BadgeCategory::Workouts, requirement: 50, rarity: Rarity::Epic },
    Badge { id: "workouts-100", name: "Master", description: "Complete 100 workouts", category: BadgeCategory::Workouts, requirement: 100, rarity: Rarity::Legendary },
    Badge { id: "streak-3", name: "In Shape", description: "3 consecutive days", category: BadgeCategory::Streak, requirement: 3, rarity: Rarity::Common },
    Badge { id: "streak-7", name: "Perfect Week", description: "7 consecutive days", category: BadgeCategory::Streak, requirement: 7, rarity: Rarity::Rare },
    Badge { id: "streak-14", name: "Disciplined", description: "14 consecutive days", category: BadgeCategory::Streak, requirement: 14, rarity: Rarity::Epic },
    Badge { id: "streak-30", name: "Machine", description: "30 consecutive days", category: BadgeCategory::Streak, requirement: 30, rarity: Rarity::Legendary },
    Badge { id: "longest-streak-10", name: "Personal Record", description: "A best streak of 10 days", category: BadgeCategory::Special, requirement: 10, rarity: Rarity::Rare },
    Badge { id: "longest-streak-30", name: "All-Time Record", description: "A best streak of 30 days", category: BadgeCategory::Special, requirement: 30, rarity: Rarity::Legendary },
];

impl Badge {
    pub fn is_unlocked(&self, stats: &ProgressStats) -> bool {
        let value = match self.category {
            BadgeCategory::Xp => stats.total_xp,
            BadgeCategory::Workouts => stats.total_workouts,
            BadgeCategory::Streak => stats.current_streak as u64,
            BadgeCategory::Special => stats.longest_streak as u64,
        };
        value >= self.requirement
    }
}

/// Look up a badge by id.
pub fn badge(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|b| b.id == id)
}

/// Evaluate the full catalog against the stats.
pub fn evaluate_badges(stats: &ProgressStats) -> BTreeSet<&'static str> {
    BADGES
        .iter()
        .filter(|b| b.is_unlocked(stats))
        .map(|b| b.id)
        .collect()
}

/// Badges in `current` that were not in the persisted `previous` set.
pub fn newly_unlocked<'a>(
    previous: &BTreeSet<String>,
    current: &BTreeSet<&'a str>,
) -> Vec<&'a str> {
    current
        .iter()
        .filter(|id| !previous.contains(**id))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_account_has_no_badges() {
        assert!(evaluate_badges(&ProgressStats::default()).is_empty());
    }

    #[test]
    fn thresholds_unlock_per_category() {
        let stats = ProgressStats {
            total_xp: 1200,
            total_workouts: 10,
            current_streak: 3,
            longest_streak: 12,
        };
        let unlocked = evaluate_badges(&stats);
        assert!(unlocked.contains("first-100"));
        assert!(unlocked.contains("xp-1000"));
        assert!(!unlocked.contains("xp-2500"));
        assert!(unlocked.contains("workouts-10"));
        assert!(unlocked.contains("streak-3"));
        assert!(!unlocked.contains("streak-7"));
        assert!(unlocked.contains("longest-streak-10"));
    }

    #[test]
    fn unlocks_are_monotone_in_stats() {
        let before = evaluate_badges(&ProgressStats {
            total_xp: 400,
            total_workouts: 5,
            current_streak: 2,
            longest_streak: 2,
        });
        let after = evaluate_badges(&ProgressStats {
            total_xp: 900,
            total_workouts: 12,
            current_streak: 4,
            longest_streak: 4,
        });
        assert!(before.is_subset(&after));
    }

    #[test]
    fn newly_unlocked_is_a_set_difference() {
        let previous: BTreeSet<String> =
            ["first-100", "first-workout"].iter().map(|s| s.to_string()).collect();
        let current = evaluate_badges(&ProgressStats {
            total_xp: 600,
            total_workouts: 1,
            current_streak: 0,
            longest_streak: 1,
        });
        let fresh = newly_unlocked(&previous, &current);
        assert_eq!(fresh, vec!["xp-500"]);
    }

    #[test]
    fn badge_lookup() {
        assert_eq!(badge("streak-7").unwrap().name, "Perfect Week");
        assert!(badge("nope").is_none());
    }
}
