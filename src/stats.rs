use crate::achievements;
use crate::models::{AnalyticsResponse, DayStatus, Streak};
use crate::streaks::{days_between, today};
use chrono::{Duration, NaiveDate};

/// Days elapsed since the streak was created, inclusive of both ends.
pub fn total_days(streak: &Streak, today: NaiveDate) -> u32 {
    days_between(streak.start_date, today) + 1
}

/// Share of tracked days covered by the current run, as a rounded percent.
/// Counts only the live run; runs broken before it are not folded in.
pub fn success_rate(streak: &Streak, today: NaiveDate) -> u32 {
    let total = total_days(streak, today);
    ((streak.current_streak as f64 / total as f64) * 100.0).round() as u32
}

/// Completed days over the last 7 calendar days (today inclusive), per day.
pub fn weekly_average(streak: &Streak, today: NaiveDate) -> f64 {
    let window_start = today - Duration::days(6);
    let completed = streak
        .history
        .iter()
        .filter(|entry| {
            entry.status == DayStatus::Completed
                && entry.date >= window_start
                && entry.date <= today
        })
        .count();
    completed as f64 / 7.0
}

/// One flag per day for the last 30 days, oldest first, 1 where the day has
/// a completed entry.
pub fn monthly_trend(streak: &Streak, today: NaiveDate) -> Vec<u8> {
    (0..30)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let done = streak
                .history
                .iter()
                .any(|entry| entry.date == date && entry.status == DayStatus::Completed);
            u8::from(done)
        })
        .collect()
}

pub fn build_analytics(streak: &Streak) -> AnalyticsResponse {
    build_analytics_at(streak, today())
}

pub fn build_analytics_at(streak: &Streak, today: NaiveDate) -> AnalyticsResponse {
    AnalyticsResponse {
        total_days: total_days(streak, today),
        success_rate: success_rate(streak, today),
        current_streak: streak.current_streak,
        longest_streak: streak.longest_streak,
        weekly_average: weekly_average(streak, today),
        monthly_trend: monthly_trend(streak, today),
        achievements: achievements::unlocked(streak),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewStreak, StreakCategory};
    use crate::streaks::{create_streak_at, fail_streak, update_streak_status};

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap() + Duration::days(n)
    }

    fn sample(created: NaiveDate) -> Streak {
        create_streak_at(
            NewStreak {
                name: "Stretch".into(),
                description: None,
                emoji: "🧘".into(),
                category: StreakCategory::Health,
            },
            created,
        )
    }

    #[test]
    fn total_days_counts_both_ends() {
        let streak = sample(day(0));
        assert_eq!(total_days(&streak, day(0)), 1);
        assert_eq!(total_days(&streak, day(9)), 10);
    }

    #[test]
    fn success_rate_is_current_run_over_total() {
        let mut streak = sample(day(0));
        update_streak_status(&mut streak, day(1));
        update_streak_status(&mut streak, day(2));
        assert_eq!(streak.current_streak, 3);

        // 3 of 10 tracked days.
        assert_eq!(success_rate(&streak, day(9)), 30);
    }

    #[test]
    fn success_rate_forgets_runs_before_a_reset() {
        let mut streak = sample(day(0));
        for n in 1..=8 {
            update_streak_status(&mut streak, day(n));
        }
        assert_eq!(streak.current_streak, 9);

        // A break on day 10 drops the rate to 1 of 11 even though nine days
        // were completed; the denominator keeps growing regardless.
        update_streak_status(&mut streak, day(10));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(success_rate(&streak, day(10)), 9);
    }

    #[test]
    fn fresh_streak_scores_full_rate() {
        let streak = sample(day(0));
        assert_eq!(success_rate(&streak, day(0)), 100);
    }

    #[test]
    fn weekly_average_counts_completed_days_in_window() {
        let mut streak = sample(day(0));
        for n in 1..=9 {
            update_streak_status(&mut streak, day(n));
        }

        // Window is day 3 through day 9: seven completed entries.
        assert_eq!(weekly_average(&streak, day(9)), 1.0);

        let mut broken = sample(day(0));
        update_streak_status(&mut broken, day(1));
        update_streak_status(&mut broken, day(9));
        // Only day 9 falls in the window as completed; the gap days are
        // skipped entries and do not count.
        assert!((weekly_average(&broken, day(9)) - 1.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn weekly_average_ignores_failed_days() {
        let mut streak = sample(day(0));
        fail_streak(&mut streak, day(1));
        assert_eq!(weekly_average(&streak, day(1)), 0.0);
    }

    #[test]
    fn monthly_trend_is_thirty_flags_oldest_first() {
        let mut streak = sample(day(0));
        update_streak_status(&mut streak, day(1));
        update_streak_status(&mut streak, day(2));

        let trend = monthly_trend(&streak, day(2));
        assert_eq!(trend.len(), 30);
        // Last two slots are days 1 and 2; everything earlier is empty.
        assert_eq!(&trend[28..], &[1, 1]);
        assert!(trend[..28].iter().all(|flag| *flag == 0));
    }

    #[test]
    fn analytics_bundle_is_consistent() {
        let mut streak = sample(day(0));
        for n in 1..=6 {
            update_streak_status(&mut streak, day(n));
        }

        let analytics = build_analytics_at(&streak, day(6));
        assert_eq!(analytics.total_days, 7);
        assert_eq!(analytics.current_streak, 7);
        assert_eq!(analytics.success_rate, 100);
        assert_eq!(analytics.monthly_trend.len(), 30);
        assert_eq!(analytics.achievements.len(), 1);
        assert_eq!(analytics.achievements[0].id, "first-week");
    }
}
