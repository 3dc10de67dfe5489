use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::achievements::Achievement;

/// One tracked habit. Serialized camelCase so the on-disk array and the wire
/// shape stay interchangeable with export/import files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub emoji: String,
    pub category: StreakCategory,
    pub start_date: NaiveDate,
    pub last_checked: NaiveDate,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StreakCategory {
    Health,
    Productivity,
    Learning,
    Lifestyle,
    #[default]
    Other,
}

/// Outcome recorded for a single calendar day; feeds the rolling analytics
/// only, never the streak counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub status: DayStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Completed,
    Failed,
    Skipped,
}

/// Advisory display status: what happens to the streak if today passes
/// without a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreakStatus {
    Active,
    AtRisk,
    Broken,
}

/// Payload for creating a streak, accepted both as JSON and as a form post.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStreak {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub category: StreakCategory,
}

/// A streak plus the fields derived from it for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakView {
    #[serde(flatten)]
    pub streak: Streak,
    pub status: StreakStatus,
    pub can_check_in: bool,
    pub total_days: u32,
    pub success_rate: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    pub streaks: Vec<StreakView>,
    pub milestone: Option<u32>,
}

/// Result of a single-streak mutation; `milestone` carries a threshold
/// crossed by this action, if any.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub streak: StreakView,
    pub milestone: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub total_days: u32,
    pub success_rate: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub weekly_average: f64,
    pub monthly_trend: Vec<u8>,
    pub achievements: Vec<&'static Achievement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub notifications: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    #[serde(default = "default_week_start")]
    pub week_starts_on: u8,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            notifications: false,
            reminder_time: None,
            week_starts_on: default_week_start(),
            sound_enabled: default_sound_enabled(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

fn default_week_start() -> u8 {
    1
}

fn default_sound_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streak_serializes_camel_case() {
        let streak = Streak {
            id: "abc".into(),
            name: "Read".into(),
            description: None,
            emoji: "📚".into(),
            category: StreakCategory::Learning,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            last_checked: NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
            current_streak: 3,
            longest_streak: 5,
            history: vec![HistoryEntry {
                date: NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
                status: DayStatus::Completed,
                note: None,
            }],
        };

        let value = serde_json::to_value(&streak).unwrap();
        assert_eq!(value["startDate"], "2026-01-01");
        assert_eq!(value["lastChecked"], "2026-01-03");
        assert_eq!(value["currentStreak"], 3);
        assert_eq!(value["longestStreak"], 5);
        assert_eq!(value["category"], "Learning");
        assert_eq!(value["history"][0]["status"], "completed");

        let back: Streak = serde_json::from_value(value).unwrap();
        assert_eq!(back, streak);
    }

    #[test]
    fn streak_deserializes_without_optional_fields() {
        let raw = r#"{
            "id": "x",
            "name": "Run",
            "emoji": "🏃",
            "category": "Health",
            "startDate": "2026-02-01",
            "lastChecked": "2026-02-01",
            "currentStreak": 1,
            "longestStreak": 1
        }"#;

        let streak: Streak = serde_json::from_str(raw).unwrap();
        assert_eq!(streak.description, None);
        assert!(streak.history.is_empty());
    }

    #[test]
    fn status_uses_kebab_case_labels() {
        assert_eq!(
            serde_json::to_value(StreakStatus::AtRisk).unwrap(),
            "at-risk"
        );
        assert_eq!(
            serde_json::to_value(StreakStatus::Active).unwrap(),
            "active"
        );
    }

    #[test]
    fn preferences_default_matches_missing_fields() {
        let parsed: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, Preferences::default());
        assert_eq!(parsed.theme, Theme::System);
        assert_eq!(parsed.week_starts_on, 1);
        assert!(parsed.sound_enabled);
    }
}
