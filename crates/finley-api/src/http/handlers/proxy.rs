//! Proxy routes used by the chat UI: `/token` and `/chat`.
//!
//! These keep the original bare JSON shapes (`{access_token, expires_in}`,
//! `{reply}`, `{error}`) rather than the `/api/v1` envelope.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use secrecy::ExposeSecret;

use finley_types::chat::{ChatReply, ChatRequest, TokenResponse};

use crate::http::error::ProxyFailure;
use crate::http::extractors::json::ProxyJson;
use crate::state::AppState;

/// POST /token - Exchange the server's API key for a bearer token.
pub async fn issue_token(State(state): State<AppState>) -> Result<Json<TokenResponse>, ProxyFailure> {
    let Some(api_key) = state.credentials.agent_api_key.as_ref() else {
        tracing::error!("AGENT_API_KEY is not set");
        return Err(ProxyFailure::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Missing API key",
        ));
    };

    let token = state.tokens.get_cached_token(api_key).await.map_err(|e| {
        tracing::error!(error = %e, "token request failed");
        ProxyFailure::from(e)
    })?;

    let now = state.tokens.now_ms();
    Ok(Json(TokenResponse {
        access_token: token.value.expose_secret().to_string(),
        expires_in: token.expires_in_secs(now),
    }))
}

/// POST /chat - Relay a message and its history to the model.
///
/// Always answers 200 with a reply for a well-formed body; upstream
/// failures become a fixed fallback reply. A malformed body is a 400
/// `{error}`.
pub async fn chat(
    State(state): State<AppState>,
    ProxyJson(body): ProxyJson<ChatRequest>,
) -> Json<ChatReply> {
    tracing::debug!(history = body.history.len(), "chat request");
    let reply = state.relay.relay(&body.message, &body.history).await;
    Json(ChatReply { reply })
}
