//! Expense ledger types, mirroring the hosted `expenses` table.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How often a recurring expense repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for RecurrencePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrencePeriod::Daily => write!(f, "daily"),
            RecurrencePeriod::Weekly => write!(f, "weekly"),
            RecurrencePeriod::Monthly => write!(f, "monthly"),
            RecurrencePeriod::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for RecurrencePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(RecurrencePeriod::Daily),
            "weekly" => Ok(RecurrencePeriod::Weekly),
            "monthly" => Ok(RecurrencePeriod::Monthly),
            "yearly" => Ok(RecurrencePeriod::Yearly),
            other => Err(format!("invalid recurrence period: '{other}'")),
        }
    }
}

/// A row of the `expenses` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<String>,
    pub amount: f64,
    /// ISO 4217 code.
    pub currency: String,
    pub description: Option<String>,
    pub expense_date: NaiveDate,
    /// `cash`, `credit_card`, `debit_card`, `bank_transfer`, or free text.
    pub payment_method: Option<String>,
    pub merchant: Option<String>,
    pub is_recurring: bool,
    pub recurrence_period: Option<RecurrencePeriod>,
    #[serde(default)]
    pub receipt_url: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for `expenses`, produced by validating an [`AddExpenseRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub user_id: Uuid,
    pub amount: f64,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub merchant: Option<String>,
    pub payment_method: Option<String>,
    pub currency: String,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub recurrence_period: Option<RecurrencePeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Raw expense form as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddExpenseRequest {
    pub amount: Option<f64>,
    pub expense_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub merchant: Option<String>,
    pub payment_method: Option<String>,
    pub currency: Option<String>,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub recurrence_period: Option<RecurrencePeriod>,
    pub tags: Option<Vec<String>>,
}

/// Aggregates shown above the expense ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub count: usize,
    pub total_spent: f64,
    pub recurring_count: usize,
    pub latest_expense_date: Option<NaiveDate>,
}

/// Expenses (newest first) with their summary.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseLedger {
    pub expenses: Vec<Expense>,
    pub summary: ExpenseSummary,
}
