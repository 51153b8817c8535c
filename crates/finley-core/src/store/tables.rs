//! Table bindings for the finance row types.

use serde_json::{Map, Value, json};

use finley_types::achievement::{Achievement, NewAchievement};
use finley_types::budget::{Budget, BudgetPatch, NewBudget, NewSavingsGoal, SavingsGoalPatch, SavingsGoalRecord};
use finley_types::expense::{Expense, NewExpense};
use finley_types::profile::{NewUserProfile, ProfilePatch, UserProfile};

use super::TableRow;

/// Patch type for tables the service never updates.
#[derive(Debug, serde::Serialize)]
pub struct NoPatch {}

impl TableRow for Budget {
    const TABLE: &'static str = "budgets";
    const ORDER_COLUMN: &'static str = "updated_at";
    type Insert = NewBudget;
    type Patch = BudgetPatch;
}

impl TableRow for SavingsGoalRecord {
    const TABLE: &'static str = "savings_goals";
    const ORDER_COLUMN: &'static str = "created_at";
    type Insert = NewSavingsGoal;
    type Patch = SavingsGoalPatch;
}

impl TableRow for Expense {
    const TABLE: &'static str = "expenses";
    const ORDER_COLUMN: &'static str = "expense_date";
    type Insert = NewExpense;
    type Patch = NoPatch;
}

impl TableRow for Achievement {
    const TABLE: &'static str = "achievements";
    const ORDER_COLUMN: &'static str = "unlocked_at";
    type Insert = NewAchievement;
    type Patch = NoPatch;
}

impl TableRow for UserProfile {
    const TABLE: &'static str = "user_profiles";
    const OWNER_COLUMN: &'static str = "id";
    const ORDER_COLUMN: &'static str = "updated_at";
    type Insert = NewUserProfile;
    type Patch = ProfilePatch;

    fn column_defaults() -> Map<String, Value> {
        let mut defaults = Map::new();
        defaults.insert("level".to_string(), json!(1));
        defaults.insert("total_points".to_string(), json!(0));
        defaults
    }
}
