//! WatsonxClient -- one client, one configured contract.
//!
//! The variant picks the endpoint, the request body and the response
//! decoder. Every call runs inside a span carrying OTel GenAI attributes.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::Instrument;

use finley_core::relay::{InferenceBackend, chat_messages, flatten_prompt};
use finley_observe::genai_attrs::{
    GEN_AI_RESPONSE_FINISH_REASONS, GEN_AI_USAGE_INPUT_TOKENS, GEN_AI_USAGE_OUTPUT_TOKENS,
    OP_CHAT, OP_INVOKE_AGENT, OP_TEXT_COMPLETION, PROVIDER_WATSONX,
};
use finley_types::chat::ConversationTurn;
use finley_types::config::InferenceConfig;
use finley_types::error::InferenceError;
use finley_types::inference::InferenceVariant;

use super::types::{ChatCompletionRequest, DeploymentRequest, InferenceReply, TextGenerationRequest};

/// Project header sent alongside the body's `project_id`.
const PROJECT_ID_HEADER: &str = "ml.project_id";

pub struct WatsonxClient {
    client: reqwest::Client,
    config: InferenceConfig,
}

impl WatsonxClient {
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InferenceError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Full URL for the configured variant, including `?version=`.
    pub fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let version = &self.config.api_version;
        match self.config.variant {
            InferenceVariant::TextGeneration => {
                format!("{base}/ml/v1/text/generation?version={version}")
            }
            InferenceVariant::Deployment => format!(
                "{base}/ml/v4/deployments/{}/ai_service?version={version}",
                self.config.deployment_id.as_deref().unwrap_or_default()
            ),
            InferenceVariant::ChatCompletion => {
                format!("{base}/ml/v1/text/chat?version={version}")
            }
        }
    }

    fn operation(&self) -> &'static str {
        match self.config.variant {
            InferenceVariant::TextGeneration => OP_TEXT_COMPLETION,
            InferenceVariant::Deployment => OP_INVOKE_AGENT,
            InferenceVariant::ChatCompletion => OP_CHAT,
        }
    }

    fn model_label(&self) -> &str {
        match self.config.variant {
            InferenceVariant::Deployment => self.config.deployment_id.as_deref().unwrap_or_default(),
            _ => self.config.model_id.as_deref().unwrap_or_default(),
        }
    }

    /// JSON request body for the configured variant.
    pub fn request_body(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<serde_json::Value, InferenceError> {
        let model_id = self.config.model_id.as_deref().unwrap_or_default();
        let project_id = self.config.project_id.as_deref().unwrap_or_default();
        let params = &self.config.parameters;

        let body = match self.config.variant {
            InferenceVariant::TextGeneration => serde_json::to_value(TextGenerationRequest {
                model_id,
                project_id,
                input: flatten_prompt(history, message),
                parameters: params,
            }),
            InferenceVariant::Deployment => serde_json::to_value(DeploymentRequest {
                messages: chat_messages(history, message),
            }),
            InferenceVariant::ChatCompletion => serde_json::to_value(ChatCompletionRequest {
                model_id,
                project_id,
                messages: chat_messages(history, message),
                max_tokens: params.max_new_tokens,
                temperature: params.temperature,
                top_p: params.top_p,
            }),
        };
        body.map_err(|e| InferenceError::Deserialization(e.to_string()))
    }

    async fn call(
        &self,
        bearer: &SecretString,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<Option<String>, InferenceError> {
        let body = self.request_body(message, history)?;

        let mut request = self
            .client
            .post(self.endpoint())
            .bearer_auth(bearer.expose_secret())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if self.config.variant == InferenceVariant::TextGeneration {
            if let Some(project_id) = self.config.project_id.as_deref() {
                request = request.header(PROJECT_ID_HEADER, project_id);
            }
        }

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(InferenceError::Upstream {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let reply = InferenceReply::decode(self.config.variant, &bytes)?;

        let span = tracing::Span::current();
        let (input_tokens, output_tokens) = reply.usage();
        if let Some(n) = input_tokens {
            span.record(GEN_AI_USAGE_INPUT_TOKENS, n);
        }
        if let Some(n) = output_tokens {
            span.record(GEN_AI_USAGE_OUTPUT_TOKENS, n);
        }
        if let Some(reason) = reply.finish_reason() {
            span.record(GEN_AI_RESPONSE_FINISH_REASONS, reason);
        }

        Ok(reply.text())
    }
}

impl InferenceBackend for WatsonxClient {
    fn variant(&self) -> InferenceVariant {
        self.config.variant
    }

    fn missing_configuration(&self) -> Vec<&'static str> {
        self.config.missing_identifiers()
    }

    async fn infer(
        &self,
        bearer: &SecretString,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<Option<String>, InferenceError> {
        let operation = self.operation();
        let model = self.model_label();
        let span = tracing::info_span!(
            "gen_ai.infer",
            otel.name = %format!("{operation} {model}"),
            gen_ai.operation.name = operation,
            gen_ai.provider.name = PROVIDER_WATSONX,
            gen_ai.request.model = %model,
            gen_ai.request.max_tokens = self.config.parameters.max_new_tokens,
            gen_ai.request.temperature = self.config.parameters.temperature,
            gen_ai.request.top_p = self.config.parameters.top_p,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
        );

        self.call(bearer, message, history).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use crate::test_support::spawn_upstream;

    #[derive(Clone, Default)]
    struct Seen(Arc<Mutex<Vec<(String, HeaderMap, Value)>>>);

    async fn text_generation(
        State(seen): State<Seen>,
        Query(q): Query<std::collections::HashMap<String, String>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        seen.0.lock().unwrap().push((
            q.get("version").cloned().unwrap_or_default(),
            headers,
            body,
        ));
        Json(json!({
            "model_id": "ibm/granite",
            "results": [{
                "generated_text": " Put 20% aside first. ",
                "generated_token_count": 6,
                "input_token_count": 21,
                "stop_reason": "stop_sequence"
            }]
        }))
    }

    async fn deployment(
        State(seen): State<Seen>,
        Path(id): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        seen.0.lock().unwrap().push((id, headers, body));
        Json(json!({ "choices": [{ "message": { "role": "assistant", "content": "From the deployment" } }] }))
    }

    async fn failing() -> impl IntoResponse {
        (StatusCode::INTERNAL_SERVER_ERROR, r#"{"errors":[{"code":"internal"}]}"#)
    }

    fn config(base: &str, variant: InferenceVariant) -> InferenceConfig {
        InferenceConfig {
            variant,
            base_url: format!("{base}/"),
            project_id: Some("proj-1".to_string()),
            model_id: Some("ibm/granite".to_string()),
            deployment_id: Some("dep-9".to_string()),
            ..Default::default()
        }
    }

    fn bearer() -> SecretString {
        SecretString::from("iam-bearer".to_string())
    }

    #[test]
    fn endpoint_per_variant() {
        let base = "https://us-south.ml.cloud.ibm.com";
        let url = |v| WatsonxClient::new(config(base, v)).unwrap().endpoint();
        assert_eq!(
            url(InferenceVariant::TextGeneration),
            "https://us-south.ml.cloud.ibm.com/ml/v1/text/generation?version=2023-05-29"
        );
        assert_eq!(
            url(InferenceVariant::Deployment),
            "https://us-south.ml.cloud.ibm.com/ml/v4/deployments/dep-9/ai_service?version=2023-05-29"
        );
        assert_eq!(
            url(InferenceVariant::ChatCompletion),
            "https://us-south.ml.cloud.ibm.com/ml/v1/text/chat?version=2023-05-29"
        );
    }

    #[test]
    fn chat_completion_body_carries_sampling_params() {
        let client = WatsonxClient::new(config("http://x", InferenceVariant::ChatCompletion)).unwrap();
        let body = client.request_body("hi", &[]).unwrap();
        assert_eq!(body["model_id"], "ibm/granite");
        assert_eq!(body["max_tokens"], 300);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
    }

    #[tokio::test]
    async fn text_generation_roundtrip() {
        let seen = Seen::default();
        let router = Router::new()
            .route("/ml/v1/text/generation", post(text_generation))
            .with_state(seen.clone());
        let base = spawn_upstream(router).await;
        let client = WatsonxClient::new(config(&base, InferenceVariant::TextGeneration)).unwrap();

        let history = vec![ConversationTurn::user("hi"), ConversationTurn::assistant("hello!")];
        let reply = client.infer(&bearer(), "How do I save?", &history).await.unwrap();
        assert_eq!(reply.as_deref(), Some(" Put 20% aside first. "));

        let seen = seen.0.lock().unwrap();
        let (version, headers, body) = &seen[0];
        assert_eq!(version, "2023-05-29");
        assert_eq!(headers["authorization"], "Bearer iam-bearer");
        assert_eq!(headers["ml.project_id"], "proj-1");
        assert_eq!(body["project_id"], "proj-1");
        assert_eq!(
            body["input"],
            "User: hi\nAssistant: hello!\nUser: How do I save?\nAssistant:"
        );
        assert_eq!(body["parameters"]["max_new_tokens"], 300);
        assert_eq!(body["parameters"]["stop_sequences"][0], "\nUser:");
    }

    #[tokio::test]
    async fn deployment_sends_message_array() {
        let seen = Seen::default();
        let router = Router::new()
            .route("/ml/v4/deployments/{id}/ai_service", post(deployment))
            .with_state(seen.clone());
        let base = spawn_upstream(router).await;
        let client = WatsonxClient::new(config(&base, InferenceVariant::Deployment)).unwrap();

        let history = vec![ConversationTurn::user("earlier")];
        let reply = client.infer(&bearer(), "now", &history).await.unwrap();
        assert_eq!(reply.as_deref(), Some("From the deployment"));

        let seen = seen.0.lock().unwrap();
        let (id, _, body) = &seen[0];
        assert_eq!(id, "dep-9");
        assert_eq!(
            body,
            &json!({ "messages": [
                { "role": "user", "content": "earlier" },
                { "role": "user", "content": "now" }
            ]})
        );
    }

    #[tokio::test]
    async fn upstream_error_carries_status_and_body() {
        let router = Router::new().route("/ml/v1/text/generation", post(failing));
        let base = spawn_upstream(router).await;
        let client = WatsonxClient::new(config(&base, InferenceVariant::TextGeneration)).unwrap();

        let err = client.infer(&bearer(), "hi", &[]).await.unwrap_err();
        match err {
            InferenceError::Upstream { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("internal"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_configuration_follows_variant() {
        let mut cfg = config("http://x", InferenceVariant::Deployment);
        cfg.deployment_id = None;
        let client = WatsonxClient::new(cfg).unwrap();
        assert_eq!(client.missing_configuration(), vec!["deployment_id"]);
    }
}
