//! Hosted inference types.
//!
//! The relay targets exactly one upstream API contract per deployment,
//! chosen by [`InferenceVariant`] in the configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which hosted-model HTTP contract the relay speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceVariant {
    /// `/ml/v1/text/generation` with a flattened `input` prompt.
    #[default]
    TextGeneration,
    /// `/ml/v4/deployments/{id}/ai_service` with a `messages` array.
    Deployment,
    /// `/ml/v1/text/chat` returning `choices[0].message.content`.
    ChatCompletion,
}

impl fmt::Display for InferenceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceVariant::TextGeneration => write!(f, "text_generation"),
            InferenceVariant::Deployment => write!(f, "deployment"),
            InferenceVariant::ChatCompletion => write!(f, "chat_completion"),
        }
    }
}

impl FromStr for InferenceVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "text_generation" => Ok(InferenceVariant::TextGeneration),
            "deployment" => Ok(InferenceVariant::Deployment),
            "chat_completion" | "chat" => Ok(InferenceVariant::ChatCompletion),
            other => Err(format!("invalid inference variant: '{other}'")),
        }
    }
}

/// Sampling parameters sent with every inference call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 300,
            temperature: 0.4,
            top_p: 0.9,
            stop_sequences: vec!["\nUser:".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parse_accepts_aliases() {
        assert_eq!(
            "text-generation".parse::<InferenceVariant>().unwrap(),
            InferenceVariant::TextGeneration
        );
        assert_eq!(
            "DEPLOYMENT".parse::<InferenceVariant>().unwrap(),
            InferenceVariant::Deployment
        );
        assert_eq!(
            "chat".parse::<InferenceVariant>().unwrap(),
            InferenceVariant::ChatCompletion
        );
        assert!("completion".parse::<InferenceVariant>().is_err());
    }

    #[test]
    fn test_variant_display_matches_serde() {
        for variant in [
            InferenceVariant::TextGeneration,
            InferenceVariant::Deployment,
            InferenceVariant::ChatCompletion,
        ] {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, format!("\"{variant}\""));
        }
    }

    #[test]
    fn test_generation_parameters_defaults() {
        let params = GenerationParameters::default();
        assert_eq!(params.max_new_tokens, 300);
        assert_eq!(params.stop_sequences, vec!["\nUser:".to_string()]);
    }
}
