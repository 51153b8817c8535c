//! Level progress and achievement unlock rules.
//!
//! Unlock conditions are evaluated against an [`ActivitySnapshot`] built
//! from the user's stored records. Streaks count calendar days on which at
//! least one expense was logged.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use finley_types::achievement::{
    Achievement, AchievementBoard, AchievementKind, LevelProgress, POINTS_PER_LEVEL,
};
use finley_types::budget::{Budget, SavingsGoalRecord};
use finley_types::expense::Expense;

pub const WEEK_STREAK_DAYS: usize = 7;
pub const MONTH_STREAK_DAYS: usize = 30;
const GURU_LEVEL: u32 = 10;

pub fn level_for_points(points: u32) -> u32 {
    points / POINTS_PER_LEVEL + 1
}

pub fn level_progress(total_points: u32) -> LevelProgress {
    let level = level_for_points(total_points);
    LevelProgress {
        level,
        total_points,
        points_to_next_level: level * POINTS_PER_LEVEL - total_points,
        max_points: AchievementKind::max_points(),
    }
}

pub fn total_points(unlocked: &[Achievement]) -> u32 {
    unlocked.iter().map(|a| a.points).sum()
}

/// Split the catalog into what the user has and what is still locked.
pub fn board(unlocked: Vec<Achievement>) -> AchievementBoard {
    let have: HashSet<AchievementKind> = unlocked.iter().filter_map(|a| a.kind()).collect();
    let locked = AchievementKind::ALL
        .iter()
        .copied()
        .filter(|k| !have.contains(k))
        .collect();
    let progress = level_progress(total_points(&unlocked));
    AchievementBoard {
        unlocked,
        locked,
        progress,
    }
}

/// Facts about a user's activity that unlock conditions look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivitySnapshot {
    pub chatted: bool,
    pub has_budget: bool,
    pub goal_count: usize,
    pub completed_goal_count: usize,
    /// Sum of `current_amount` across savings goals.
    pub total_saved: f64,
    /// Longest run of consecutive days with a logged expense.
    pub longest_tracking_streak: usize,
    /// True when some 30-day tracked run stayed within needs + wants.
    pub stayed_on_budget_for_month: bool,
}

impl ActivitySnapshot {
    pub fn from_records(
        chatted: bool,
        budget: Option<&Budget>,
        goals: &[SavingsGoalRecord],
        expenses: &[Expense],
    ) -> Self {
        let daily = daily_totals(expenses);
        let spending_limit = budget.map(|b| {
            b.monthly_income * (b.needs_percentage + b.wants_percentage) / 100.0
        });

        Self {
            chatted,
            has_budget: budget.is_some(),
            goal_count: goals.len(),
            completed_goal_count: goals
                .iter()
                .filter(|g| g.completed || g.current_amount >= g.target_amount)
                .count(),
            total_saved: goals.iter().map(|g| g.current_amount).sum(),
            longest_tracking_streak: longest_streak(&daily),
            stayed_on_budget_for_month: spending_limit
                .is_some_and(|limit| month_within_limit(&daily, limit)),
        }
    }
}

fn daily_totals(expenses: &[Expense]) -> BTreeMap<NaiveDate, f64> {
    let mut days = BTreeMap::new();
    for e in expenses {
        *days.entry(e.expense_date).or_insert(0.0) += e.amount;
    }
    days
}

/// Split sorted days into runs of consecutive dates.
fn runs(daily: &BTreeMap<NaiveDate, f64>) -> Vec<Vec<f64>> {
    let mut out: Vec<Vec<f64>> = Vec::new();
    let mut prev: Option<NaiveDate> = None;
    for (&day, &total) in daily {
        let continues = prev.is_some_and(|p| p.succ_opt() == Some(day));
        prev = Some(day);
        if continues {
            if let Some(run) = out.last_mut() {
                run.push(total);
                continue;
            }
        }
        out.push(vec![total]);
    }
    out
}

fn longest_streak(daily: &BTreeMap<NaiveDate, f64>) -> usize {
    runs(daily).iter().map(Vec::len).max().unwrap_or(0)
}

fn month_within_limit(daily: &BTreeMap<NaiveDate, f64>, limit: f64) -> bool {
    runs(daily).iter().any(|run| {
        run.windows(MONTH_STREAK_DAYS)
            .any(|window| window.iter().sum::<f64>() <= limit)
    })
}

fn condition_holds(kind: AchievementKind, s: &ActivitySnapshot) -> bool {
    match kind {
        AchievementKind::FirstChat => s.chatted,
        AchievementKind::FirstBudget => s.has_budget,
        AchievementKind::SavingsGoal => s.goal_count > 0,
        AchievementKind::WeekStreak => s.longest_tracking_streak >= WEEK_STREAK_DAYS,
        AchievementKind::Save100 => s.total_saved >= 100.0,
        AchievementKind::Save1000 => s.total_saved >= 1000.0,
        AchievementKind::GoalComplete => s.completed_goal_count > 0,
        AchievementKind::MonthStreak => s.stayed_on_budget_for_month,
        // Checked after the others, against the resulting point total.
        AchievementKind::FinancialGuru => false,
    }
}

/// Catalog kinds whose condition holds and that are not unlocked yet, in
/// catalog order.
pub fn newly_unlocked(snapshot: &ActivitySnapshot, unlocked: &[Achievement]) -> Vec<AchievementKind> {
    let have: HashSet<AchievementKind> = unlocked.iter().filter_map(|a| a.kind()).collect();
    let mut fresh: Vec<AchievementKind> = AchievementKind::ALL
        .iter()
        .copied()
        .filter(|k| !have.contains(k) && condition_holds(*k, snapshot))
        .collect();

    let points = total_points(unlocked) + fresh.iter().map(|k| k.points()).sum::<u32>();
    if !have.contains(&AchievementKind::FinancialGuru) && level_for_points(points) >= GURU_LEVEL {
        fresh.push(AchievementKind::FinancialGuru);
    }
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn unlocked(kind: AchievementKind) -> Achievement {
        Achievement {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            achievement_type: kind.to_string(),
            title: kind.title().to_string(),
            description: kind.description().to_string(),
            points: kind.points(),
            icon: kind.icon().to_string(),
            unlocked_at: Utc::now(),
            created_at: None,
        }
    }

    fn expense_on(day: NaiveDate, amount: f64) -> Expense {
        Expense {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            category_id: None,
            amount,
            currency: "USD".to_string(),
            description: None,
            expense_date: day,
            payment_method: None,
            merchant: None,
            is_recurring: false,
            recurrence_period: None,
            receipt_url: None,
            notes: None,
            tags: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn goal(target: f64, current: f64) -> SavingsGoalRecord {
        SavingsGoalRecord {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            goal_name: "Trip".to_string(),
            target_amount: target,
            current_amount: current,
            deadline: None,
            weekly_target: 0.0,
            completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn budget(income: f64) -> Budget {
        Budget {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            monthly_income: income,
            needs_percentage: 50.0,
            wants_percentage: 30.0,
            savings_percentage: 20.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_level_progress() {
        assert_eq!(
            level_progress(0),
            LevelProgress {
                level: 1,
                total_points: 0,
                points_to_next_level: 100,
                max_points: 710,
            }
        );
        let p = level_progress(260);
        assert_eq!(p.level, 3);
        assert_eq!(p.points_to_next_level, 40);
        let p = level_progress(300);
        assert_eq!(p.level, 4);
        assert_eq!(p.points_to_next_level, 100);
    }

    #[test]
    fn test_board_splits_catalog() {
        let b = board(vec![
            unlocked(AchievementKind::FirstChat),
            unlocked(AchievementKind::FirstBudget),
        ]);
        assert_eq!(b.unlocked.len(), 2);
        assert_eq!(b.locked.len(), 7);
        assert!(!b.locked.contains(&AchievementKind::FirstChat));
        assert_eq!(b.progress.total_points, 35);
    }

    #[test]
    fn test_snapshot_from_records() {
        let goals = vec![goal(100.0, 120.0), goal(5000.0, 80.0)];
        let s = ActivitySnapshot::from_records(true, None, &goals, &[]);
        assert!(s.chatted);
        assert!(!s.has_budget);
        assert_eq!(s.goal_count, 2);
        assert_eq!(s.completed_goal_count, 1);
        assert_eq!(s.total_saved, 200.0);
        assert_eq!(s.longest_tracking_streak, 0);
    }

    #[test]
    fn test_streak_counts_consecutive_days_only() {
        let mut expenses: Vec<Expense> = (0..7)
            .map(|d| expense_on(start() + Duration::days(d), 10.0))
            .collect();
        // Second expense on a tracked day, then a gap.
        expenses.push(expense_on(start(), 5.0));
        expenses.push(expense_on(start() + Duration::days(9), 5.0));

        let s = ActivitySnapshot::from_records(false, None, &[], &expenses);
        assert_eq!(s.longest_tracking_streak, 7);
    }

    #[test]
    fn test_month_streak_requires_spending_within_limit() {
        let expenses: Vec<Expense> = (0..30)
            .map(|d| expense_on(start() + Duration::days(d), 20.0))
            .collect();

        // 600 spent against needs + wants of 800.
        let s = ActivitySnapshot::from_records(false, Some(&budget(1000.0)), &[], &expenses);
        assert!(s.stayed_on_budget_for_month);

        // 600 spent against needs + wants of 400.
        let s = ActivitySnapshot::from_records(false, Some(&budget(500.0)), &[], &expenses);
        assert!(!s.stayed_on_budget_for_month);

        let s = ActivitySnapshot::from_records(false, None, &[], &expenses);
        assert!(!s.stayed_on_budget_for_month);
    }

    #[test]
    fn test_newly_unlocked_skips_existing() {
        let snapshot = ActivitySnapshot {
            chatted: true,
            has_budget: true,
            goal_count: 1,
            total_saved: 150.0,
            ..Default::default()
        };
        let have = vec![unlocked(AchievementKind::FirstChat)];
        let fresh = newly_unlocked(&snapshot, &have);
        assert_eq!(
            fresh,
            vec![
                AchievementKind::FirstBudget,
                AchievementKind::SavingsGoal,
                AchievementKind::Save100,
            ]
        );
    }

    #[test]
    fn test_nothing_unlocked_for_empty_activity() {
        assert!(newly_unlocked(&ActivitySnapshot::default(), &[]).is_empty());
    }

    #[test]
    fn test_guru_unlocks_from_point_total() {
        let snapshot = ActivitySnapshot::default();
        // 9 levels' worth of points from rows of an unknown legacy kind.
        let mut legacy = unlocked(AchievementKind::FirstChat);
        legacy.achievement_type = "legacy_bonus".to_string();
        legacy.points = 900;
        let fresh = newly_unlocked(&snapshot, &[legacy]);
        assert_eq!(fresh, vec![AchievementKind::FinancialGuru]);
    }
}
