//! Request and response shapes for each watsonx.ai contract.
//!
//! Responses are decoded into the shape of the configured variant only;
//! [`InferenceReply`] is the tagged union over those shapes.

use serde::{Deserialize, Serialize};

use finley_types::chat::ConversationTurn;
use finley_types::error::InferenceError;
use finley_types::inference::{GenerationParameters, InferenceVariant};

// --- Requests ---

#[derive(Debug, Serialize)]
pub struct TextGenerationRequest<'a> {
    pub model_id: &'a str,
    pub project_id: &'a str,
    pub input: String,
    pub parameters: &'a GenerationParameters,
}

#[derive(Debug, Serialize)]
pub struct DeploymentRequest {
    pub messages: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model_id: &'a str,
    pub project_id: &'a str,
    pub messages: Vec<ConversationTurn>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

// --- Responses ---

#[derive(Debug, Default, Deserialize)]
pub struct GeneratedResult {
    #[serde(default)]
    pub generated_text: Option<String>,
    #[serde(default)]
    pub generated_token_count: Option<u64>,
    #[serde(default)]
    pub input_token_count: Option<u64>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
}

/// `/ml/v1/text/generation`.
#[derive(Debug, Default, Deserialize)]
pub struct TextGenerationResponse {
    #[serde(default)]
    pub results: Vec<GeneratedResult>,
    #[serde(default)]
    pub generated_text: Option<String>,
    #[serde(default)]
    pub output_text: Option<String>,
}

/// `/ml/v4/deployments/{id}/ai_service`. Deployed services answer in
/// either the chat or the generation shape.
#[derive(Debug, Default, Deserialize)]
pub struct DeploymentResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub results: Vec<GeneratedResult>,
    #[serde(default)]
    pub generated_text: Option<String>,
    #[serde(default)]
    pub output_text: Option<String>,
}

/// `/ml/v1/text/chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

fn first_choice_content(choices: &[Choice]) -> Option<String> {
    choices
        .first()
        .and_then(|c| c.message.as_ref())
        .and_then(|m| m.content.clone())
}

fn first_generated_text(results: &[GeneratedResult]) -> Option<String> {
    results.first().and_then(|r| r.generated_text.clone())
}

#[derive(Debug)]
pub enum InferenceReply {
    TextGeneration(TextGenerationResponse),
    Deployment(DeploymentResponse),
    ChatCompletion(ChatCompletionResponse),
}

impl InferenceReply {
    /// Decode `body` as the response shape of `variant`.
    pub fn decode(variant: InferenceVariant, body: &[u8]) -> Result<Self, InferenceError> {
        let de = |e: serde_json::Error| InferenceError::Deserialization(e.to_string());
        Ok(match variant {
            InferenceVariant::TextGeneration => {
                InferenceReply::TextGeneration(serde_json::from_slice(body).map_err(de)?)
            }
            InferenceVariant::Deployment => {
                InferenceReply::Deployment(serde_json::from_slice(body).map_err(de)?)
            }
            InferenceVariant::ChatCompletion => {
                InferenceReply::ChatCompletion(serde_json::from_slice(body).map_err(de)?)
            }
        })
    }

    /// The reply text from the first known location that is present.
    pub fn text(&self) -> Option<String> {
        match self {
            InferenceReply::TextGeneration(r) => first_generated_text(&r.results)
                .or_else(|| r.generated_text.clone())
                .or_else(|| r.output_text.clone()),
            InferenceReply::Deployment(r) => first_choice_content(&r.choices)
                .or_else(|| first_generated_text(&r.results))
                .or_else(|| r.generated_text.clone())
                .or_else(|| r.output_text.clone()),
            InferenceReply::ChatCompletion(r) => first_choice_content(&r.choices),
        }
    }

    /// `(input_tokens, output_tokens)` when the upstream reported them.
    pub fn usage(&self) -> (Option<u64>, Option<u64>) {
        match self {
            InferenceReply::TextGeneration(TextGenerationResponse { results, .. })
            | InferenceReply::Deployment(DeploymentResponse { results, .. }) => results
                .first()
                .map(|r| (r.input_token_count, r.generated_token_count))
                .unwrap_or_default(),
            InferenceReply::ChatCompletion(r) => r
                .usage
                .as_ref()
                .map(|u| (u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default(),
        }
    }

    pub fn finish_reason(&self) -> Option<&str> {
        match self {
            InferenceReply::TextGeneration(r) => r.results.first()?.stop_reason.as_deref(),
            InferenceReply::Deployment(r) => r
                .choices
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .or_else(|| r.results.first()?.stop_reason.as_deref()),
            InferenceReply::ChatCompletion(r) => r.choices.first()?.finish_reason.as_deref(),
        }
    }
}
