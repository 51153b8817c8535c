//! Budget handlers.

use std::time::Instant;

use axum::Json;

use finley_core::budget::{allocation_report, validate_allocation};
use finley_types::budget::{AllocationReport, BudgetAllocation, BudgetView};

use crate::http::error::AppError;
use crate::http::extractors::auth::FinanceSession;
use crate::http::extractors::json::ApiJson;
use crate::http::response::ApiResponse;

/// GET /api/v1/budget - The caller's latest budget, or `null`.
pub async fn get_budget(
    session: FinanceSession,
) -> Result<Json<ApiResponse<Option<BudgetView>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let budget = session.service.get_budget(&session.user).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(budget, request_id, elapsed).with_link("self", "/api/v1/budget"),
    ))
}

/// PUT /api/v1/budget - Create or update the caller's budget.
pub async fn save_budget(
    session: FinanceSession,
    ApiJson(body): ApiJson<BudgetAllocation>,
) -> Result<Json<ApiResponse<BudgetView>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let budget = session.service.save_budget(&session.user, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(budget, request_id, elapsed)
            .with_link("self", "/api/v1/budget")
            .with_link("dashboard", "/api/v1/dashboard"),
    ))
}

/// POST /api/v1/budget/allocate - Split an income without storing it.
pub async fn allocate(
    ApiJson(body): ApiJson<BudgetAllocation>,
) -> Result<Json<ApiResponse<AllocationReport>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    validate_allocation(&body)?;
    let report = allocation_report(&body);
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(report, request_id, elapsed)))
}
