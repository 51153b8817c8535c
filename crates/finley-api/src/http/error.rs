//! Application error types mapping to HTTP status codes.
//!
//! `/api/v1` routes answer with the envelope format; the proxy routes
//! (`/token`, `/chat`) answer with a bare `{error}` body.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use finley_types::chat::ProxyError;
use finley_types::error::{AuthError, FinanceError, StoreError, ValidationError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Finance-service errors (validation or store).
    Finance(FinanceError),
    /// Malformed request body.
    BadRequest(String),
    /// Missing or malformed bearer header.
    Unauthorized(String),
    /// No persistence backend configured.
    FinanceDisabled,
}

impl From<FinanceError> for AppError {
    fn from(e: FinanceError) -> Self {
        AppError::Finance(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Finance(FinanceError::Store(e))
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Finance(FinanceError::Validation(e))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Finance(FinanceError::Validation(e)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Finance(FinanceError::Store(e)) => match e {
                StoreError::NotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", "Record not found".to_string())
                }
                StoreError::Unauthorized => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Session is missing or expired. Sign in again.".to_string(),
                ),
                StoreError::NotConfigured => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "FINANCE_DISABLED",
                    e.to_string(),
                ),
                StoreError::Upstream { .. }
                | StoreError::Transport(_)
                | StoreError::Deserialization(_) => {
                    (StatusCode::BAD_GATEWAY, "STORE_ERROR", e.to_string())
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::FinanceDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "FINANCE_DISABLED",
                "Finance routes are disabled: set SUPABASE_URL and SUPABASE_ANON_KEY.".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }
        let request_id = uuid::Uuid::now_v7().to_string();
        (status, Json(ApiResponse::error(code, &message, request_id, 0))).into_response()
    }
}

/// Error answer of the proxy routes: a status and a `{error}` body.
#[derive(Debug)]
pub struct ProxyFailure {
    pub status: StatusCode,
    pub error: String,
}

impl ProxyFailure {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }
}

impl From<AuthError> for ProxyFailure {
    fn from(e: AuthError) -> Self {
        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error = match e {
            AuthError::Configuration => "Missing API key".to_string(),
            AuthError::Upstream { body, .. } => body,
            AuthError::Transport(_) | AuthError::Deserialization(_) => {
                "Failed to get IAM token".to_string()
            }
        };
        Self { status, error }
    }
}

impl From<JsonRejection> for ProxyFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ProxyFailure {
    fn into_response(self) -> Response {
        (self.status, Json(ProxyError { error: self.error })).into_response()
    }
}
