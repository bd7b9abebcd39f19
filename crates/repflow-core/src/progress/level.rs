//! Experience-point level curve.
//!
//! The curve is quadratic: reaching level L takes `(L-1)^2 * 1000` XP, so
//! `level = floor(sqrt(xp / 1000)) + 1`. Pure and deterministic.

use serde::{Deserialize, Serialize};

/// XP required to leave level 1.
pub const LEVEL_BASE_XP: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// Current level, starting at 1.
    pub level: u32,
    /// Fraction of the current level's XP band, in [0, 100].
    pub progress_percent: f64,
    /// XP at which the current level begins.
    pub xp_floor: u64,
    /// XP at which the next level begins.
    pub xp_ceiling: u64,
    /// XP still missing to the next level.
    pub xp_to_next: u64,
}

/// Map accumulated XP to a level and in-level progress.
pub fn calculate_level(xp: u64) -> LevelInfo {
    let level = (xp / LEVEL_BASE_XP).isqrt() + 1;
    let xp_floor = (level - 1).pow(2).saturating_mul(LEVEL_BASE_XP);
    let xp_ceiling = level.pow(2).saturating_mul(LEVEL_BASE_XP);
    // Band width is at least LEVEL_BASE_XP for every level.
    let band = (xp_ceiling - xp_floor) as f64;
    let progress_percent = ((xp - xp_floor) as f64 / band * 100.0).clamp(0.0, 100.0);
    LevelInfo {
        level: level as u32,
        progress_percent,
        xp_floor,
        xp_ceiling,
        xp_to_next: xp_ceiling.saturating_sub(xp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_xp_is_level_one_with_no_progress() {
        let info = calculate_level(0);
        assert_eq!(info.level, 1);
        assert_eq!(info.progress_percent, 0.0);
        assert_eq!(info.xp_floor, 0);
        assert_eq!(info.xp_ceiling, 1000);
        assert_eq!(info.xp_to_next, 1000);
    }

    #[test]
    fn level_boundary_at_1000() {
        let below = calculate_level(999);
        assert_eq!(below.level, 1);
        assert!(below.progress_percent > 99.0);

        let at = calculate_level(1000);
        assert_eq!(at.level, 2);
        assert_eq!(at.progress_percent, 0.0);
        assert_eq!(at.xp_floor, 1000);
        assert_eq!(at.xp_ceiling, 4000);
    }

    #[test]
    fn mid_band_progress() {
        // Level 2 band is [1000, 4000): 2500 is halfway.
        let info = calculate_level(2500);
        assert_eq!(info.level, 2);
        assert_eq!(info.progress_percent, 50.0);
        assert_eq!(info.xp_to_next, 1500);
    }

    proptest! {
        #[test]
        fn level_is_monotonic(xp1 in 0u64..10_000_000, xp2 in 0u64..10_000_000) {
            let (lo, hi) = if xp1 <= xp2 { (xp1, xp2) } else { (xp2, xp1) };
            prop_assert!(calculate_level(lo).level <= calculate_level(hi).level);
        }

        #[test]
        fn xp_sits_inside_its_band(xp in 0u64..10_000_000) {
            let info = calculate_level(xp);
            prop_assert!(info.xp_floor <= xp);
            prop_assert!(xp < info.xp_ceiling);
            prop_assert!((0.0..=100.0).contains(&info.progress_percent));
        }
    }
}
