//! Achievement catalog and the hosted `achievements` table.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Points needed per level.
pub const POINTS_PER_LEVEL: u32 = 100;

/// Every achievement a user can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstChat,
    FirstBudget,
    SavingsGoal,
    WeekStreak,
    Save100,
    Save1000,
    GoalComplete,
    MonthStreak,
    FinancialGuru,
}

impl AchievementKind {
    /// The full catalog in display order.
    pub const ALL: [AchievementKind; 9] = [
        AchievementKind::FirstChat,
        AchievementKind::FirstBudget,
        AchievementKind::SavingsGoal,
        AchievementKind::WeekStreak,
        AchievementKind::Save100,
        AchievementKind::Save1000,
        AchievementKind::GoalComplete,
        AchievementKind::MonthStreak,
        AchievementKind::FinancialGuru,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AchievementKind::FirstChat => "Hello, Finley!",
            AchievementKind::FirstBudget => "Budget Beginner",
            AchievementKind::SavingsGoal => "Goal Setter",
            AchievementKind::WeekStreak => "Week Warrior",
            AchievementKind::Save100 => "Century Saver",
            AchievementKind::Save1000 => "Grand Saver",
            AchievementKind::GoalComplete => "Dream Achiever",
            AchievementKind::MonthStreak => "Monthly Master",
            AchievementKind::FinancialGuru => "Financial Guru",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementKind::FirstChat => "Started your first conversation with Finley",
            AchievementKind::FirstBudget => "Created your first budget",
            AchievementKind::SavingsGoal => "Set up your first savings goal",
            AchievementKind::WeekStreak => "Tracked your budget for 7 days straight",
            AchievementKind::Save100 => "Saved your first $100",
            AchievementKind::Save1000 => "Reached $1,000 in savings",
            AchievementKind::GoalComplete => "Completed your first savings goal",
            AchievementKind::MonthStreak => "Stayed on budget for 30 days",
            AchievementKind::FinancialGuru => "Reached Level 10",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AchievementKind::FirstChat => "👋",
            AchievementKind::FirstBudget => "💰",
            AchievementKind::SavingsGoal => "🎯",
            AchievementKind::WeekStreak => "🔥",
            AchievementKind::Save100 => "💵",
            AchievementKind::Save1000 => "💎",
            AchievementKind::GoalComplete => "🏆",
            AchievementKind::MonthStreak => "⭐",
            AchievementKind::FinancialGuru => "🤑",
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            AchievementKind::FirstChat => 10,
            AchievementKind::FirstBudget | AchievementKind::SavingsGoal => 25,
            AchievementKind::WeekStreak | AchievementKind::Save100 => 50,
            AchievementKind::Save1000 | AchievementKind::GoalComplete => 100,
            AchievementKind::MonthStreak => 150,
            AchievementKind::FinancialGuru => 200,
        }
    }

    /// Sum of points over the whole catalog.
    pub fn max_points() -> u32 {
        Self::ALL.iter().map(|k| k.points()).sum()
    }
}

impl fmt::Display for AchievementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AchievementKind::FirstChat => "first_chat",
            AchievementKind::FirstBudget => "first_budget",
            AchievementKind::SavingsGoal => "savings_goal",
            AchievementKind::WeekStreak => "week_streak",
            AchievementKind::Save100 => "save_100",
            AchievementKind::Save1000 => "save_1000",
            AchievementKind::GoalComplete => "goal_complete",
            AchievementKind::MonthStreak => "month_streak",
            AchievementKind::FinancialGuru => "financial_guru",
        };
        write!(f, "{s}")
    }
}

impl FromStr for AchievementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AchievementKind::ALL
            .iter()
            .copied()
            .find(|k| k.to_string() == s)
            .ok_or_else(|| format!("unknown achievement type: '{s}'"))
    }
}

/// A row of the `achievements` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub achievement_type: String,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Achievement {
    /// The catalog entry this row refers to, if it is a known kind.
    pub fn kind(&self) -> Option<AchievementKind> {
        self.achievement_type.parse().ok()
    }
}

/// Insert payload for `achievements`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAchievement {
    pub user_id: Uuid,
    pub achievement_type: String,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
}

impl NewAchievement {
    pub fn unlock(user_id: Uuid, kind: AchievementKind, at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            achievement_type: kind.to_string(),
            title: kind.title().to_string(),
            description: kind.description().to_string(),
            points: kind.points(),
            icon: kind.icon().to_string(),
            unlocked_at: at,
        }
    }
}

/// Level derived from unlocked points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub total_points: u32,
    pub points_to_next_level: u32,
    pub max_points: u32,
}

/// Request body for `POST /api/v1/achievements/evaluate`.
///
/// Chat history stays on the client, so the client reports whether the
/// user has talked to the assistant.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct EvaluateAchievementsRequest {
    pub chatted: bool,
}

/// Result of an evaluation pass.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationOutcome {
    pub newly_unlocked: Vec<Achievement>,
    pub progress: LevelProgress,
}

/// Unlocked achievements with level progress.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementBoard {
    pub unlocked: Vec<Achievement>,
    pub locked: Vec<AchievementKind>,
    pub progress: LevelProgress,
}
