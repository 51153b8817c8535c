//! Profile and dashboard handlers.

use std::time::Instant;

use axum::Json;

use finley_types::dashboard::DashboardSummary;
use finley_types::profile::{UpdateProfileRequest, UserProfile};

use crate::http::error::AppError;
use crate::http::extractors::auth::FinanceSession;
use crate::http::extractors::json::ApiJson;
use crate::http::response::ApiResponse;

/// GET /api/v1/profile - The caller's profile, created on first access.
pub async fn get_profile(session: FinanceSession) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let profile = session.service.get_profile(&session.user).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(profile, request_id, elapsed).with_link("self", "/api/v1/profile"),
    ))
}

/// PUT /api/v1/profile - Change the display name.
pub async fn update_profile(
    session: FinanceSession,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let profile = session
        .service
        .update_display_name(&session.user, &body.display_name)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(profile, request_id, elapsed)))
}

/// GET /api/v1/dashboard - Budget, goal and achievement totals plus hints.
pub async fn dashboard(
    session: FinanceSession,
) -> Result<Json<ApiResponse<DashboardSummary>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let summary = session.service.dashboard(&session.user).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(summary, request_id, elapsed)
            .with_link("budget", "/api/v1/budget")
            .with_link("goals", "/api/v1/goals")
            .with_link("achievements", "/api/v1/achievements"),
    ))
}
