//! Expense ledger handlers.

use std::time::Instant;

use axum::Json;

use finley_types::expense::{AddExpenseRequest, Expense, ExpenseLedger};

use crate::http::error::AppError;
use crate::http::extractors::auth::FinanceSession;
use crate::http::extractors::json::ApiJson;
use crate::http::response::ApiResponse;

/// GET /api/v1/expenses - Ledger newest first, with its summary.
pub async fn list_expenses(
    session: FinanceSession,
) -> Result<Json<ApiResponse<ExpenseLedger>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let ledger = session.service.list_expenses(&session.user).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(ledger, request_id, elapsed).with_link("self", "/api/v1/expenses"),
    ))
}

/// POST /api/v1/expenses - Validate and store one expense.
pub async fn add_expense(
    session: FinanceSession,
    ApiJson(body): ApiJson<AddExpenseRequest>,
) -> Result<Json<ApiResponse<Expense>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let expense = session.service.add_expense(&session.user, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(expense, request_id, elapsed).with_link("ledger", "/api/v1/expenses"),
    ))
}
