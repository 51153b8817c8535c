//! Savings goal handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::Path;
use chrono::Utc;

use finley_core::budget::{project_goal, validate_goal};
use finley_types::budget::{
    CreateGoalRequest, GoalProjection, GoalView, SavingsGoal, UpdateGoalProgressRequest,
};
use finley_types::error::StoreError;

use crate::http::error::AppError;
use crate::http::extractors::auth::FinanceSession;
use crate::http::extractors::json::ApiJson;
use crate::http::response::ApiResponse;

/// GET /api/v1/goals - The caller's goals with projections, newest first.
pub async fn list_goals(session: FinanceSession) -> Result<Json<ApiResponse<Vec<GoalView>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let goals = session.service.list_goals(&session.user).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(goals, request_id, elapsed).with_link("self", "/api/v1/goals"),
    ))
}

/// POST /api/v1/goals - Create a savings goal.
pub async fn create_goal(
    session: FinanceSession,
    ApiJson(body): ApiJson<CreateGoalRequest>,
) -> Result<Json<ApiResponse<GoalView>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let view = session.service.create_goal(&session.user, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let progress_link = format!("/api/v1/goals/{}/progress", view.goal.id);
    Ok(Json(
        ApiResponse::success(view, request_id, elapsed)
            .with_link("self", "/api/v1/goals")
            .with_link("progress", &progress_link),
    ))
}

/// PUT /api/v1/goals/{id}/progress - Record a new saved amount.
pub async fn update_progress(
    session: FinanceSession,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateGoalProgressRequest>,
) -> Result<Json<ApiResponse<GoalView>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let goal_id = id.parse().map_err(|_| AppError::from(StoreError::NotFound))?;
    let view = session
        .service
        .update_goal_progress(&session.user, goal_id, body.current_amount)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(view, request_id, elapsed)))
}

/// POST /api/v1/goals/project - Project a goal for today without storing it.
pub async fn project(
    ApiJson(body): ApiJson<SavingsGoal>,
) -> Result<Json<ApiResponse<GoalProjection>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    validate_goal(&body)?;
    let projection = project_goal(&body, Utc::now().date_naive());
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(projection, request_id, elapsed)))
}
