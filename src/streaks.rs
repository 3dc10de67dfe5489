use crate::models::{DayStatus, HistoryEntry, NewStreak, Streak, StreakStatus};
use chrono::{Duration, Local, NaiveDate};
use uuid::Uuid;

/// Streak lengths that trigger a celebration when reached exactly.
pub const MILESTONES: [u32; 5] = [7, 30, 50, 100, 365];

pub const DEFAULT_EMOJI: &str = "✨";

/// Current instant truncated to local-midnight granularity.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole calendar days separating two dates, independent of ordering.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> u32 {
    (a - b).num_days().unsigned_abs() as u32
}

pub fn create_streak(new_streak: NewStreak) -> Streak {
    create_streak_at(new_streak, today())
}

pub fn create_streak_at(new_streak: NewStreak, today: NaiveDate) -> Streak {
    let emoji = if new_streak.emoji.trim().is_empty() {
        DEFAULT_EMOJI.to_string()
    } else {
        new_streak.emoji
    };

    Streak {
        id: Uuid::new_v4().to_string(),
        name: new_streak.name,
        description: new_streak.description,
        emoji,
        category: new_streak.category,
        start_date: today,
        last_checked: today,
        current_streak: 1,
        longest_streak: 1,
        history: Vec::new(),
    }
}

/// How a streak moved when re-evaluated against a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Already evaluated today.
    Unchanged,
    /// Exactly one day passed; the run grew by one.
    Continued { milestone: Option<u32> },
    /// More than one day passed; the run restarted at one.
    Reset,
}

/// The core state machine. Keyed by the whole-day gap since `last_checked`:
/// 0 is a no-op, 1 continues the run, anything longer resets it to one with
/// `longest_streak` untouched. Idempotent within a calendar day.
pub fn update_streak_status(streak: &mut Streak, today: NaiveDate) -> Transition {
    let days = days_between(streak.last_checked, today);

    match days {
        0 => Transition::Unchanged,
        1 => {
            streak.current_streak += 1;
            streak.longest_streak = streak.longest_streak.max(streak.current_streak);
            streak.last_checked = today;
            record_day(streak, today, DayStatus::Completed);
            Transition::Continued {
                milestone: milestone_for(streak.current_streak),
            }
        }
        _ => {
            for offset in (1..days).rev() {
                record_day(streak, today - Duration::days(offset as i64), DayStatus::Skipped);
            }
            streak.current_streak = 1;
            streak.last_checked = today;
            record_day(streak, today, DayStatus::Completed);
            Transition::Reset
        }
    }
}

/// Explicit "I broke my streak today". Bypasses the day-gap table entirely;
/// never fires a milestone.
pub fn fail_streak(streak: &mut Streak, today: NaiveDate) {
    streak.current_streak = 1;
    streak.last_checked = today;
    record_day(streak, today, DayStatus::Failed);
}

/// What would happen if today passed without a check-in. Read-only.
pub fn derive_status(streak: &Streak, today: NaiveDate) -> StreakStatus {
    match days_between(streak.last_checked, today) {
        0 => StreakStatus::Active,
        1 => StreakStatus::AtRisk,
        _ => StreakStatus::Broken,
    }
}

/// A check-in is accepted at most once per calendar day.
pub fn can_check_in(streak: &Streak, today: NaiveDate) -> bool {
    days_between(streak.last_checked, today) > 0
}

/// Re-evaluates every streak in order. Returns whether anything moved and
/// the most recently crossed milestone; there is one session-wide milestone
/// slot, so the last crossing observed wins.
pub fn refresh_all(streaks: &mut [Streak], today: NaiveDate) -> (bool, Option<u32>) {
    let mut changed = false;
    let mut crossed = None;

    for streak in streaks.iter_mut() {
        match update_streak_status(streak, today) {
            Transition::Unchanged => {}
            Transition::Continued { milestone } => {
                changed = true;
                if milestone.is_some() {
                    crossed = milestone;
                }
            }
            Transition::Reset => changed = true,
        }
    }

    (changed, crossed)
}

fn milestone_for(current: u32) -> Option<u32> {
    MILESTONES.iter().copied().find(|milestone| *milestone == current)
}

// One history entry per date; a later status for the same day overwrites.
fn record_day(streak: &mut Streak, date: NaiveDate, status: DayStatus) {
    if let Some(last) = streak.history.last_mut() {
        if last.date == date {
            last.status = status;
            return;
        }
    }
    streak.history.push(HistoryEntry {
        date,
        status,
        note: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StreakCategory;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(n)
    }

    fn sample(created: NaiveDate) -> Streak {
        create_streak_at(
            NewStreak {
                name: "Read".into(),
                description: None,
                emoji: String::new(),
                category: StreakCategory::Learning,
            },
            created,
        )
    }

    fn assert_invariants(streak: &Streak) {
        assert!(streak.current_streak >= 1);
        assert!(streak.longest_streak >= streak.current_streak);
        assert!(streak.last_checked >= streak.start_date);
    }

    #[test]
    fn factory_fills_defaults() {
        let streak = sample(day(0));
        assert_eq!(streak.emoji, DEFAULT_EMOJI);
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 1);
        assert_eq!(streak.start_date, day(0));
        assert_eq!(streak.last_checked, day(0));
        assert!(streak.history.is_empty());
        assert_invariants(&streak);
    }

    #[test]
    fn factory_ids_are_unique() {
        let a = sample(day(0));
        let b = sample(day(0));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn days_between_is_symmetric() {
        assert_eq!(days_between(day(0), day(3)), 3);
        assert_eq!(days_between(day(3), day(0)), 3);
        assert_eq!(days_between(day(5), day(5)), 0);
    }

    #[test]
    fn next_day_continues_the_run() {
        let mut streak = sample(day(0));
        let transition = update_streak_status(&mut streak, day(1));

        assert_eq!(transition, Transition::Continued { milestone: None });
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.last_checked, day(1));
        assert_invariants(&streak);
    }

    #[test]
    fn same_day_update_is_a_noop() {
        let mut streak = sample(day(0));
        update_streak_status(&mut streak, day(1));
        let snapshot = streak.clone();

        let transition = update_streak_status(&mut streak, day(1));
        assert_eq!(transition, Transition::Unchanged);
        assert_eq!(streak, snapshot);
    }

    #[test]
    fn gap_resets_current_but_keeps_longest() {
        let mut streak = sample(day(0));
        update_streak_status(&mut streak, day(1));
        assert_eq!(streak.current_streak, 2);

        let transition = update_streak_status(&mut streak, day(4));
        assert_eq!(transition, Transition::Reset);
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.last_checked, day(4));
        assert_invariants(&streak);
    }

    // The worked sequence: create on day 0, advance one day, repeat the same
    // day, then skip to day 3.
    #[test]
    fn create_advance_repeat_then_gap() {
        let mut streak = sample(day(0));

        assert_eq!(
            update_streak_status(&mut streak, day(1)),
            Transition::Continued { milestone: None }
        );
        assert_eq!((streak.current_streak, streak.longest_streak), (2, 2));

        assert_eq!(update_streak_status(&mut streak, day(1)), Transition::Unchanged);

        assert_eq!(update_streak_status(&mut streak, day(3)), Transition::Reset);
        assert_eq!((streak.current_streak, streak.longest_streak), (1, 2));
    }

    #[test]
    fn milestone_fires_on_exact_threshold() {
        let mut streak = sample(day(0));
        for n in 1..6 {
            update_streak_status(&mut streak, day(n));
        }
        assert_eq!(streak.current_streak, 6);

        let transition = update_streak_status(&mut streak, day(6));
        assert_eq!(transition, Transition::Continued { milestone: Some(7) });
    }

    #[test]
    fn milestone_fires_only_once() {
        let mut streak = sample(day(0));
        for n in 1..=6 {
            update_streak_status(&mut streak, day(n));
        }
        assert_eq!(streak.current_streak, 7);

        let transition = update_streak_status(&mut streak, day(7));
        assert_eq!(transition, Transition::Continued { milestone: None });
    }

    #[test]
    fn forced_fail_never_fires_a_milestone() {
        let mut streak = sample(day(0));
        for n in 1..=5 {
            update_streak_status(&mut streak, day(n));
        }
        assert_eq!(streak.current_streak, 6);

        fail_streak(&mut streak, day(5));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 6);
        assert_eq!(streak.last_checked, day(5));
        assert_eq!(streak.history.last().unwrap().status, DayStatus::Failed);
        assert_invariants(&streak);

        // Continuing from a forced reset passes over 7 without reaching it
        // exactly from the milestone's own run, so nothing fires until the
        // count genuinely climbs back.
        let transition = update_streak_status(&mut streak, day(6));
        assert_eq!(transition, Transition::Continued { milestone: None });
    }

    #[test]
    fn history_records_completions_and_gaps() {
        let mut streak = sample(day(0));
        update_streak_status(&mut streak, day(1));
        update_streak_status(&mut streak, day(4));

        let days: Vec<(NaiveDate, DayStatus)> = streak
            .history
            .iter()
            .map(|entry| (entry.date, entry.status))
            .collect();
        assert_eq!(
            days,
            vec![
                (day(1), DayStatus::Completed),
                (day(2), DayStatus::Skipped),
                (day(3), DayStatus::Skipped),
                (day(4), DayStatus::Completed),
            ]
        );
    }

    #[test]
    fn history_keeps_one_entry_per_day() {
        let mut streak = sample(day(0));
        update_streak_status(&mut streak, day(1));
        fail_streak(&mut streak, day(1));

        assert_eq!(streak.history.len(), 1);
        assert_eq!(streak.history[0].status, DayStatus::Failed);
    }

    #[test]
    fn status_follows_the_day_gap() {
        let streak = sample(day(0));
        assert_eq!(derive_status(&streak, day(0)), StreakStatus::Active);
        assert_eq!(derive_status(&streak, day(1)), StreakStatus::AtRisk);
        assert_eq!(derive_status(&streak, day(2)), StreakStatus::Broken);
    }

    #[test]
    fn check_in_allowed_once_per_day() {
        let streak = sample(day(0));
        assert!(!can_check_in(&streak, day(0)));
        assert!(can_check_in(&streak, day(1)));
        assert!(can_check_in(&streak, day(9)));
    }

    #[test]
    fn derive_status_does_not_mutate() {
        let streak = sample(day(0));
        let snapshot = streak.clone();
        derive_status(&streak, day(5));
        assert_eq!(streak, snapshot);
    }

    #[test]
    fn refresh_all_reports_change_and_last_milestone() {
        let mut first = sample(day(1));
        for n in 2..=6 {
            update_streak_status(&mut first, day(n));
        }
        let mut second = sample(day(-22));
        for n in -21..=6 {
            update_streak_status(&mut second, day(n));
        }
        assert_eq!(first.current_streak, 6);
        assert_eq!(second.current_streak, 29);

        // Both cross a milestone on day 7; the single slot keeps the last
        // crossing seen in iteration order.
        let mut streaks = vec![first, second];
        let (changed, crossed) = refresh_all(&mut streaks, day(7));
        assert!(changed);
        assert_eq!(crossed, Some(30));
        assert_eq!(streaks[0].current_streak, 7);
        assert_eq!(streaks[1].current_streak, 30);

        let (changed, crossed) = refresh_all(&mut streaks, day(7));
        assert!(!changed);
        assert_eq!(crossed, None);
    }
}
