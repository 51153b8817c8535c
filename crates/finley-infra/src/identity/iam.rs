//! IBM Cloud IAM implementation of `TokenExchange`.
//!
//! `POST {url}` with a form body
//! `grant_type=urn:ibm:params:oauth:grant-type:apikey&apikey=...`,
//! answered with `{access_token, expires_in, ...}`.

use std::time::Duration;

use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use finley_core::auth::{TokenExchange, TokenGrant};
use finley_types::config::IdentityConfig;
use finley_types::error::AuthError;

pub const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

#[derive(Debug, Deserialize)]
struct IamTokenBody {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

pub struct IamTokenExchange {
    client: reqwest::Client,
    url: String,
}

impl IamTokenExchange {
    pub fn new(config: &IdentityConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TokenExchange for IamTokenExchange {
    async fn exchange(&self, api_key: &SecretString) -> Result<TokenGrant, AuthError> {
        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", APIKEY_GRANT_TYPE),
                ("apikey", api_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "IAM token exchange rejected");
            return Err(AuthError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: IamTokenBody = response
            .json()
            .await
            .map_err(|e| AuthError::Deserialization(e.to_string()))?;
        if body.access_token.is_empty() {
            return Err(AuthError::Deserialization(
                "IAM response carried an empty access_token".to_string(),
            ));
        }

        Ok(TokenGrant {
            access_token: SecretString::from(body.access_token),
            expires_in_secs: body.expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Form, Json, Router};
    use serde_json::json;

    use crate::test_support::spawn_upstream;

    async fn iam(Form(form): Form<HashMap<String, String>>) -> axum::response::Response {
        if form.get("grant_type").map(String::as_str) != Some(APIKEY_GRANT_TYPE) {
            return (StatusCode::BAD_REQUEST, "bad grant_type").into_response();
        }
        match form.get("apikey").map(String::as_str) {
            Some("good-key") => Json(json!({
                "access_token": "eyJ-bearer",
                "refresh_token": "not_supported",
                "token_type": "Bearer",
                "expires_in": 3600,
                "expiration": 1_900_000_000u64
            }))
            .into_response(),
            Some("short+key/=") => Json(json!({ "access_token": "encoded-ok" })).into_response(),
            _ => (
                StatusCode::BAD_REQUEST,
                r#"{"errorCode":"BXNIM0415E","errorMessage":"Provided API key could not be found."}"#,
            )
                .into_response(),
        }
    }

    async fn exchange_for(api_key: &str) -> Result<TokenGrant, AuthError> {
        let base = spawn_upstream(Router::new().route("/identity/token", post(iam))).await;
        let exchange = IamTokenExchange::new(&IdentityConfig {
            url: format!("{base}/identity/token"),
            ..Default::default()
        })
        .unwrap();
        exchange
            .exchange(&SecretString::from(api_key.to_string()))
            .await
    }

    #[tokio::test]
    async fn exchange_returns_token_and_expiry() {
        let grant = exchange_for("good-key").await.unwrap();
        assert_eq!(grant.access_token.expose_secret(), "eyJ-bearer");
        assert_eq!(grant.expires_in_secs, Some(3600));
    }

    #[tokio::test]
    async fn exchange_form_encodes_api_key() {
        let grant = exchange_for("short+key/=").await.unwrap();
        assert_eq!(grant.access_token.expose_secret(), "encoded-ok");
        assert_eq!(grant.expires_in_secs, None);
    }

    #[tokio::test]
    async fn exchange_surfaces_upstream_status_and_body() {
        let err = exchange_for("wrong").await.unwrap_err();
        match err {
            AuthError::Upstream { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("BXNIM0415E"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn exchange_unreachable_is_transport_error() {
        let exchange = IamTokenExchange::new(&IdentityConfig {
            url: "http://127.0.0.1:9/identity/token".to_string(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();
        let err = exchange
            .exchange(&SecretString::from("k".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
    }
}
