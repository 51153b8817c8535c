//! Achievement handlers.

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;

use finley_types::achievement::{AchievementBoard, EvaluateAchievementsRequest, EvaluationOutcome};

use crate::http::error::AppError;
use crate::http::extractors::auth::FinanceSession;
use crate::http::response::ApiResponse;

/// GET /api/v1/achievements - Unlocked and locked achievements with level progress.
pub async fn list_achievements(
    session: FinanceSession,
) -> Result<Json<ApiResponse<AchievementBoard>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let board = session.service.list_achievements(&session.user).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(board, request_id, elapsed).with_link("self", "/api/v1/achievements"),
    ))
}

/// POST /api/v1/achievements/evaluate - Unlock whatever the caller has earned.
///
/// Chat history lives in the client, so it reports `{"chatted": true}`
/// once the user has talked to Finley. An empty body counts as `false`.
pub async fn evaluate(
    session: FinanceSession,
    body: Bytes,
) -> Result<Json<ApiResponse<EvaluationOutcome>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let request: EvaluateAchievementsRequest = if body.is_empty() {
        EvaluateAchievementsRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?
    };
    let outcome = session
        .service
        .evaluate_achievements(&session.user, request.chatted)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(outcome, request_id, elapsed)
            .with_link("achievements", "/api/v1/achievements"),
    ))
}
