//! Allocation and weekly-savings-target arithmetic.
//!
//! Plain `f64` throughout with no rounding; presentation layers format.

use chrono::NaiveDate;

use finley_types::budget::{
    AllocationBreakdown, AllocationReport, BudgetAllocation, GoalProjection, SavingsGoal,
};
use finley_types::error::ValidationError;

/// Split `income` into needs / wants / savings amounts.
pub fn allocate(income: f64, needs_pct: f64, wants_pct: f64, savings_pct: f64) -> AllocationBreakdown {
    AllocationBreakdown {
        needs_amount: income * needs_pct / 100.0,
        wants_amount: income * wants_pct / 100.0,
        savings_amount: income * savings_pct / 100.0,
    }
}

pub fn percent_total(allocation: &BudgetAllocation) -> f64 {
    allocation.needs_pct + allocation.wants_pct + allocation.savings_pct
}

/// Breakdown plus the slider sum. An unbalanced split is reported, not rejected.
pub fn allocation_report(allocation: &BudgetAllocation) -> AllocationReport {
    let total = percent_total(allocation);
    AllocationReport {
        allocation: *allocation,
        breakdown: allocate(
            allocation.monthly_income,
            allocation.needs_pct,
            allocation.wants_pct,
            allocation.savings_pct,
        ),
        percent_total: total,
        balanced: (total - 100.0).abs() < 1e-9,
    }
}

/// Reject negative income and sliders outside 0..=100.
pub fn validate_allocation(allocation: &BudgetAllocation) -> Result<(), ValidationError> {
    if !allocation.monthly_income.is_finite() || allocation.monthly_income < 0.0 {
        return Err(ValidationError::NegativeIncome);
    }
    let sliders = [
        ("needs", allocation.needs_pct),
        ("wants", allocation.wants_pct),
        ("savings", allocation.savings_pct),
    ];
    for (name, pct) in sliders {
        if !(0.0..=100.0).contains(&pct) {
            return Err(ValidationError::PercentOutOfRange(name));
        }
    }
    Ok(())
}

/// Reject a non-positive target or a negative saved amount.
pub fn validate_goal(goal: &SavingsGoal) -> Result<(), ValidationError> {
    if !goal.target_amount.is_finite() || goal.target_amount <= 0.0 {
        return Err(ValidationError::InvalidTarget);
    }
    if !goal.current_amount.is_finite() || goal.current_amount < 0.0 {
        return Err(ValidationError::NegativeAmount);
    }
    Ok(())
}

/// Whole weeks from `today` to `deadline`, rounded up. Zero or negative
/// once the deadline is today or past.
fn weeks_until(deadline: NaiveDate, today: NaiveDate) -> i64 {
    let days = (deadline - today).num_days();
    (days as f64 / 7.0).ceil() as i64
}

/// Amount to set aside each week to reach `target` by `deadline`.
///
/// A deadline that has arrived or passed asks for the whole remainder now.
pub fn weekly_target(target: f64, current: f64, deadline: NaiveDate, today: NaiveDate) -> f64 {
    let remaining = (target - current).max(0.0);
    if remaining == 0.0 {
        return 0.0;
    }
    let weeks = weeks_until(deadline, today);
    if weeks <= 0 {
        return remaining;
    }
    remaining / weeks as f64
}

/// `current / target * 100`, unclamped. A non-positive target yields 0.
pub fn progress_pct(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    current / target * 100.0
}

pub fn project_goal(goal: &SavingsGoal, today: NaiveDate) -> GoalProjection {
    let remaining = (goal.target_amount - goal.current_amount).max(0.0);
    let (weeks_remaining, weekly) = match goal.deadline {
        Some(deadline) => (
            Some(weeks_until(deadline, today)),
            weekly_target(goal.target_amount, goal.current_amount, deadline, today),
        ),
        None => (None, 0.0),
    };
    GoalProjection {
        remaining,
        weeks_remaining,
        weekly_target: weekly,
        progress_pct: progress_pct(goal.current_amount, goal.target_amount),
        completed: goal.current_amount >= goal.target_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_allocate_fifty_thirty_twenty() {
        let b = allocate(1000.0, 50.0, 30.0, 20.0);
        assert_eq!(b.needs_amount, 500.0);
        assert_eq!(b.wants_amount, 300.0);
        assert_eq!(b.savings_amount, 200.0);
    }

    #[test]
    fn test_allocate_zero_income() {
        let b = allocate(0.0, 50.0, 30.0, 20.0);
        assert_eq!(
            (b.needs_amount, b.wants_amount, b.savings_amount),
            (0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_report_flags_unbalanced_split() {
        let alloc = BudgetAllocation {
            monthly_income: 2000.0,
            needs_pct: 60.0,
            wants_pct: 30.0,
            savings_pct: 20.0,
        };
        let report = allocation_report(&alloc);
        assert_eq!(report.percent_total, 110.0);
        assert!(!report.balanced);
        assert_eq!(report.breakdown.needs_amount, 1200.0);

        let report = allocation_report(&BudgetAllocation::default());
        assert!(report.balanced);
    }

    #[test]
    fn test_validate_allocation_bounds() {
        assert!(validate_allocation(&BudgetAllocation::default()).is_ok());

        let negative = BudgetAllocation {
            monthly_income: -1.0,
            ..Default::default()
        };
        assert_eq!(
            validate_allocation(&negative),
            Err(ValidationError::NegativeIncome)
        );

        let too_much = BudgetAllocation {
            wants_pct: 101.0,
            ..Default::default()
        };
        assert_eq!(
            validate_allocation(&too_much),
            Err(ValidationError::PercentOutOfRange("wants"))
        );
    }

    #[test]
    fn test_validate_goal_amounts() {
        let goal = |target: f64, current: f64| SavingsGoal {
            target_amount: target,
            current_amount: current,
            deadline: None,
        };
        assert!(validate_goal(&goal(1000.0, 0.0)).is_ok());
        assert!(validate_goal(&goal(1000.0, 1500.0)).is_ok());
        assert_eq!(
            validate_goal(&goal(-100.0, 50.0)),
            Err(ValidationError::InvalidTarget)
        );
        assert_eq!(
            validate_goal(&goal(0.0, 0.0)),
            Err(ValidationError::InvalidTarget)
        );
        assert_eq!(
            validate_goal(&goal(100.0, -1.0)),
            Err(ValidationError::NegativeAmount)
        );
        assert_eq!(
            validate_goal(&goal(f64::NAN, 0.0)),
            Err(ValidationError::InvalidTarget)
        );
    }

    #[test]
    fn test_weekly_target_two_weeks_out() {
        let deadline = today() + Duration::days(14);
        assert_eq!(weekly_target(1000.0, 200.0, deadline, today()), 400.0);
    }

    #[test]
    fn test_weekly_target_goal_already_met() {
        let deadline = today() + Duration::days(30);
        assert_eq!(weekly_target(1000.0, 1000.0, deadline, today()), 0.0);
        assert_eq!(weekly_target(1000.0, 1200.0, deadline, today()), 0.0);
    }

    #[test]
    fn test_weekly_target_past_deadline_is_whole_remainder() {
        let yesterday = today() - Duration::days(1);
        assert_eq!(weekly_target(500.0, 0.0, yesterday, today()), 500.0);
        assert_eq!(weekly_target(500.0, 100.0, today(), today()), 400.0);
    }

    #[test]
    fn test_weekly_target_rounds_weeks_up() {
        // 8 days is two (partial) weeks.
        let deadline = today() + Duration::days(8);
        assert_eq!(weekly_target(100.0, 0.0, deadline, today()), 50.0);
    }

    #[test]
    fn test_progress_pct() {
        assert_eq!(progress_pct(50.0, 200.0), 25.0);
        assert_eq!(progress_pct(300.0, 200.0), 150.0);
        assert_eq!(progress_pct(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_project_goal_with_deadline() {
        let goal = SavingsGoal {
            target_amount: 1000.0,
            current_amount: 200.0,
            deadline: Some(today() + Duration::days(14)),
        };
        let p = project_goal(&goal, today());
        assert_eq!(p.remaining, 800.0);
        assert_eq!(p.weeks_remaining, Some(2));
        assert_eq!(p.weekly_target, 400.0);
        assert_eq!(p.progress_pct, 20.0);
        assert!(!p.completed);
    }

    #[test]
    fn test_project_goal_without_deadline() {
        let goal = SavingsGoal {
            target_amount: 300.0,
            current_amount: 300.0,
            deadline: None,
        };
        let p = project_goal(&goal, today());
        assert_eq!(p.weeks_remaining, None);
        assert_eq!(p.weekly_target, 0.0);
        assert_eq!(p.remaining, 0.0);
        assert!(p.completed);
    }
}
