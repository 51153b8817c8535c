//! Budget and savings-goal types.
//!
//! `BudgetAllocation` and `SavingsGoal` inputs are plain numbers entered by
//! the user; the derived amounts live in `AllocationBreakdown` and
//! `GoalProjection`. Row types (`Budget`, `SavingsGoalRecord`) mirror the
//! hosted `budgets` and `savings_goals` tables.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Income split into needs / wants / savings percentages.
///
/// Percentages are independent sliders (0-100 each) and are not required
/// to sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetAllocation {
    pub monthly_income: f64,
    pub needs_pct: f64,
    pub wants_pct: f64,
    pub savings_pct: f64,
}

impl Default for BudgetAllocation {
    /// The 50/30/20 rule with no income entered yet.
    fn default() -> Self {
        Self {
            monthly_income: 0.0,
            needs_pct: 50.0,
            wants_pct: 30.0,
            savings_pct: 20.0,
        }
    }
}

/// Amounts derived from a [`BudgetAllocation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationBreakdown {
    pub needs_amount: f64,
    pub wants_amount: f64,
    pub savings_amount: f64,
}

/// Allocation breakdown plus the slider sum, as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationReport {
    pub allocation: BudgetAllocation,
    pub breakdown: AllocationBreakdown,
    pub percent_total: f64,
    /// True when the three percentages add up to exactly 100.
    pub balanced: bool,
}

/// A row of the `budgets` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub monthly_income: f64,
    pub needs_percentage: f64,
    pub wants_percentage: f64,
    pub savings_percentage: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn allocation(&self) -> BudgetAllocation {
        BudgetAllocation {
            monthly_income: self.monthly_income,
            needs_pct: self.needs_percentage,
            wants_pct: self.wants_percentage,
            savings_pct: self.savings_percentage,
        }
    }
}

/// Insert payload for `budgets`; the store assigns `id` and timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct NewBudget {
    pub user_id: Uuid,
    pub monthly_income: f64,
    pub needs_percentage: f64,
    pub wants_percentage: f64,
    pub savings_percentage: f64,
}

impl NewBudget {
    pub fn from_allocation(user_id: Uuid, allocation: &BudgetAllocation) -> Self {
        Self {
            user_id,
            monthly_income: allocation.monthly_income,
            needs_percentage: allocation.needs_pct,
            wants_percentage: allocation.wants_pct,
            savings_percentage: allocation.savings_pct,
        }
    }
}

/// Partial update for `budgets`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BudgetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wants_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BudgetPatch {
    pub fn from_allocation(allocation: &BudgetAllocation, now: DateTime<Utc>) -> Self {
        Self {
            monthly_income: Some(allocation.monthly_income),
            needs_percentage: Some(allocation.needs_pct),
            wants_percentage: Some(allocation.wants_pct),
            savings_percentage: Some(allocation.savings_pct),
            updated_at: Some(now),
        }
    }
}

/// A stored budget together with its derived amounts.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetView {
    pub budget: Budget,
    pub breakdown: AllocationBreakdown,
    pub percent_total: f64,
}

/// User input describing a savings goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

/// Values derived from a [`SavingsGoal`] on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProjection {
    /// `max(0, target - current)`.
    pub remaining: f64,
    /// Whole weeks until the deadline, rounded up. `None` without a deadline.
    pub weeks_remaining: Option<i64>,
    pub weekly_target: f64,
    pub progress_pct: f64,
    pub completed: bool,
}

/// A row of the `savings_goals` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoalRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub weekly_target: f64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavingsGoalRecord {
    pub fn goal(&self) -> SavingsGoal {
        SavingsGoal {
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            deadline: self.deadline,
        }
    }
}

/// Insert payload for `savings_goals`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSavingsGoal {
    pub user_id: Uuid,
    pub goal_name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub weekly_target: f64,
    pub completed: bool,
}

/// Partial update for `savings_goals`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SavingsGoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for creating a savings goal.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoalRequest {
    pub goal_name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: Option<f64>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

/// Request body for updating a goal's saved amount.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGoalProgressRequest {
    pub current_amount: f64,
}

/// A stored goal with its projection for today.
#[derive(Debug, Clone, Serialize)]
pub struct GoalView {
    pub goal: SavingsGoalRecord,
    pub projection: GoalProjection,
}
