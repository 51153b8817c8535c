//! Bearer session extractor for the finance routes.
//!
//! Reads the caller's Supabase access token from `Authorization: Bearer
//! <jwt>` and resolves it to a user through the store. Every finance
//! handler takes a [`FinanceSession`], so routes are scoped to that user.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use secrecy::SecretString;

use finley_core::store::UserSession;

use crate::http::error::AppError;
use crate::state::{AppState, ConcreteFinanceService};

/// An authenticated caller together with the finance service.
pub struct FinanceSession {
    pub service: Arc<ConcreteFinanceService>,
    pub user: UserSession,
}

impl FromRequestParts<AppState> for FinanceSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let service = state.finance.clone().ok_or(AppError::FinanceDisabled)?;
        let token = extract_bearer(parts)?;
        let user = service.authenticate(SecretString::from(token)).await?;
        Ok(FinanceSession { service, user })
    }
}

/// Extract the bearer token from the `Authorization` header.
fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let Some(auth) = parts.headers.get("authorization") else {
        return Err(AppError::Unauthorized(
            "Missing session. Provide 'Authorization: Bearer <access token>'.".to_string(),
        ));
    };
    let auth_str = auth.to_str().map_err(|_| {
        AppError::Unauthorized("Invalid Authorization header encoding".to_string())
    })?;
    match auth_str.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(AppError::Unauthorized(
            "Authorization header must use the Bearer scheme".to_string(),
        )),
    }
}
