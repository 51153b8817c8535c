//! Expense form validation and ledger aggregation.

use uuid::Uuid;

use finley_types::error::ValidationError;
use finley_types::expense::{AddExpenseRequest, Expense, ExpenseLedger, ExpenseSummary, NewExpense};

pub const DEFAULT_CURRENCY: &str = "USD";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Turn a submitted form into an insert payload for `user_id`.
pub fn validate_expense(user_id: Uuid, request: AddExpenseRequest) -> Result<NewExpense, ValidationError> {
    let amount = request
        .amount
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or(ValidationError::InvalidAmount)?;
    let expense_date = request.expense_date.ok_or(ValidationError::MissingDate)?;

    let currency = non_blank(request.currency)
        .map(|c| c.to_uppercase())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let tags = request
        .tags
        .map(|tags| {
            tags.into_iter()
                .filter_map(|t| non_blank(Some(t)))
                .collect::<Vec<_>>()
        })
        .filter(|tags| !tags.is_empty());

    Ok(NewExpense {
        user_id,
        amount,
        expense_date,
        description: non_blank(request.description),
        category_id: non_blank(request.category_id),
        merchant: non_blank(request.merchant),
        payment_method: non_blank(request.payment_method),
        currency,
        notes: non_blank(request.notes),
        is_recurring: request.is_recurring,
        recurrence_period: if request.is_recurring {
            Some(request.recurrence_period.unwrap_or_default())
        } else {
            None
        },
        tags,
    })
}

/// Newest `expense_date` first; ties keep the most recently created first.
pub fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        b.expense_date
            .cmp(&a.expense_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

pub fn summarize(expenses: &[Expense]) -> ExpenseSummary {
    ExpenseSummary {
        count: expenses.len(),
        total_spent: expenses.iter().map(|e| e.amount).sum(),
        recurring_count: expenses.iter().filter(|e| e.is_recurring).count(),
        latest_expense_date: expenses.iter().map(|e| e.expense_date).max(),
    }
}

pub fn ledger(mut expenses: Vec<Expense>) -> ExpenseLedger {
    sort_newest_first(&mut expenses);
    let summary = summarize(&expenses);
    ExpenseLedger { expenses, summary }
}
