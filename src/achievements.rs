use crate::models::Streak;
use serde::Serialize;

/// A badge earned by holding a streak long enough. Unlocks are derived from
/// `longest_streak`, so a badge survives the run that earned it breaking.
#[derive(Debug, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    #[serde(skip)]
    threshold: u32,
}

impl Achievement {
    pub fn unlocked_by(&self, streak: &Streak) -> bool {
        streak.longest_streak >= self.threshold
    }
}

pub const ACHIEVEMENTS: [Achievement; 5] = [
    Achievement {
        id: "first-week",
        name: "First Week Complete",
        description: "Maintain a streak for 7 days",
        icon: "🌟",
        threshold: 7,
    },
    Achievement {
        id: "one-month",
        name: "One Month Strong",
        description: "Maintain a streak for 30 days",
        icon: "🎉",
        threshold: 30,
    },
    Achievement {
        id: "halfway-to-100",
        name: "Halfway to 100",
        description: "Maintain a streak for 50 days",
        icon: "🚀",
        threshold: 50,
    },
    Achievement {
        id: "century-club",
        name: "Century Club",
        description: "Maintain a streak for 100 days",
        icon: "💫",
        threshold: 100,
    },
    Achievement {
        id: "one-year-champion",
        name: "One Year Champion",
        description: "Maintain a streak for 365 days",
        icon: "🏆",
        threshold: 365,
    },
];

pub fn unlocked(streak: &Streak) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|achievement| achievement.unlocked_by(streak))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewStreak, StreakCategory};
    use crate::streaks::create_streak_at;
    use chrono::NaiveDate;

    fn streak_with_longest(longest: u32) -> Streak {
        let mut streak = create_streak_at(
            NewStreak {
                name: "Write".into(),
                description: None,
                emoji: "✍️".into(),
                category: StreakCategory::Productivity,
            },
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        );
        streak.current_streak = 1;
        streak.longest_streak = longest;
        streak
    }

    #[test]
    fn nothing_unlocked_below_first_threshold() {
        assert!(unlocked(&streak_with_longest(6)).is_empty());
    }

    #[test]
    fn thresholds_unlock_in_order() {
        let ids: Vec<&str> = unlocked(&streak_with_longest(50))
            .iter()
            .map(|achievement| achievement.id)
            .collect();
        assert_eq!(ids, vec!["first-week", "one-month", "halfway-to-100"]);
    }

    #[test]
    fn badges_survive_a_broken_run() {
        // current_streak is back to 1 but the high-water mark keeps the badge.
        let streak = streak_with_longest(7);
        assert_eq!(unlocked(&streak).len(), 1);
        assert_eq!(unlocked(&streak)[0].id, "first-week");
    }
}
