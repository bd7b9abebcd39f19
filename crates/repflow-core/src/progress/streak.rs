//! Consecutive-day workout streaks.
//!
//! A streak counts calendar days with at least one completed workout.
//! Timestamps are normalized to UTC dates and deduplicated first, so two
//! workouts on the same day never inflate the count.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_workout_date: Option<NaiveDate>,
}

impl StreakData {
    fn empty() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            last_workout_date: None,
        }
    }
}

/// Compute streaks relative to the current UTC date.
pub fn calculate_streaks_now(timestamps: &[DateTime<Utc>]) -> StreakData {
    calculate_streaks(timestamps, Utc::now().date_naive())
}

/// Compute current and longest streaks from workout timestamps.
///
/// The current streak is alive only while the most recent workout is today
/// or yesterday relative to `today`; a single qualifying day counts as 1.
pub fn calculate_streaks(timestamps: &[DateTime<Utc>], today: NaiveDate) -> StreakData {
    let unique: BTreeSet<NaiveDate> = timestamps.iter().map(|ts| ts.date_naive()).collect();
    if unique.is_empty() {
        return StreakData::empty();
    }
    // Newest first.
    let dates: Vec<NaiveDate> = unique.into_iter().rev().collect();
    let last = dates[0];

    let current_streak = if (today - last).num_days() <= 1 {
        let mut count = 1u32;
        let mut prev = last;
        for &date in &dates[1..] {
            if (prev - date).num_days() == 1 {
                count += 1;
                prev = date;
            } else {
                break;
            }
        }
        count
    } else {
        0
    };

    let mut longest_streak = 1u32;
    let mut run = 1u32;
    for pair in dates.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            run += 1;
        } else {
            longest_streak = longest_streak.max(run);
            run = 1;
        }
    }
    longest_streak = longest_streak.max(run);

    StreakData {
        current_streak,
        longest_streak,
        last_workout_date: Some(last),
    }
}

/// Human-readable streak length.
pub fn format_streak(streak: u32) -> String {
    match streak {
        0 => "No streak".to_string(),
        1 => "1 day".to_string(),
        n => format!("{n} days"),
    }
}

/// Motivational one-liner for the dashboard.
pub fn streak_message(current_streak: u32, longest_streak: u32) -> String {
    if current_streak == 0 {
        return "Start your streak today!".to_string();
    }
    if current_streak == 1 {
        return "First day of your streak! Come back tomorrow!".to_string();
    }
    if current_streak >= longest_streak {
        return format!("New record! {current_streak} days in a row!");
    }
    if current_streak >= 7 {
        return "A full week! You're on fire!".to_string();
    }
    format!("{current_streak} days in a row! Keep it up!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn at_noon(date: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
    }

    fn days_ago(n: i64) -> DateTime<Utc> {
        at_noon(today() - Duration::days(n))
    }

    #[test]
    fn no_workouts_means_no_streak() {
        let data = calculate_streaks(&[], today());
        assert_eq!(data.current_streak, 0);
        assert_eq!(data.longest_streak, 0);
        assert!(data.last_workout_date.is_none());
    }

    #[test]
    fn same_day_workouts_count_once() {
        let single = calculate_streaks(&[days_ago(0)], today());
        let double = calculate_streaks(
            &[days_ago(0), at_noon(today()) + Duration::hours(5)],
            today(),
        );
        assert_eq!(single.current_streak, 1);
        assert_eq!(double, single);
    }

    #[test]
    fn three_consecutive_days() {
        let data = calculate_streaks(&[days_ago(0), days_ago(1), days_ago(2)], today());
        assert_eq!(data.current_streak, 3);
        assert_eq!(data.longest_streak, 3);
        assert_eq!(data.last_workout_date, Some(today()));
    }

    #[test]
    fn gap_resets_the_walk() {
        let data = calculate_streaks(&[days_ago(0), days_ago(3)], today());
        assert_eq!(data.current_streak, 1);
        assert_eq!(data.longest_streak, 1);
    }

    #[test]
    fn stale_last_workout_kills_current_streak() {
        let data = calculate_streaks(&[days_ago(5)], today());
        assert_eq!(data.current_streak, 0);
        assert_eq!(data.longest_streak, 1);
        assert_eq!(data.last_workout_date, Some(today() - Duration::days(5)));
    }

    #[test]
    fn yesterday_keeps_the_streak_alive() {
        let data = calculate_streaks(&[days_ago(1), days_ago(2)], today());
        assert_eq!(data.current_streak, 2);
    }

    #[test]
    fn longest_streak_found_in_history() {
        // Old 4-day run, then a gap, then 2 recent days.
        let ts = [
            days_ago(0),
            days_ago(1),
            days_ago(10),
            days_ago(11),
            days_ago(12),
            days_ago(13),
        ];
        let data = calculate_streaks(&ts, today());
        assert_eq!(data.current_streak, 2);
        assert_eq!(data.longest_streak, 4);
    }

    #[test]
    fn streak_formatting() {
        assert_eq!(format_streak(0), "No streak");
        assert_eq!(format_streak(1), "1 day");
        assert_eq!(format_streak(12), "12 days");
    }

    proptest! {
        #[test]
        fn duplicates_never_change_the_result(offsets in proptest::collection::vec(0i64..60, 1..20)) {
            let ts: Vec<_> = offsets.iter().map(|&n| days_ago(n)).collect();
            let mut doubled = ts.clone();
            doubled.extend(ts.iter().map(|t| *t + Duration::hours(3)));
            prop_assert_eq!(
                calculate_streaks(&ts, today()),
                calculate_streaks(&doubled, today())
            );
        }

        #[test]
        fn current_never_exceeds_longest(offsets in proptest::collection::vec(0i64..60, 0..20)) {
            let ts: Vec<_> = offsets.iter().map(|&n| days_ago(n)).collect();
            let data = calculate_streaks(&ts, today());
            prop_assert!(data.current_streak <= data.longest_streak);
        }
    }
}
