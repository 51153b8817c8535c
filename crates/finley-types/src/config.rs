//! Configuration types for Finley.
//!
//! `FinleyConfig` represents `config.toml`. Every field has a default so an
//! empty or missing file yields a usable configuration; secrets are never
//! part of this file and are resolved from the environment instead.

use serde::{Deserialize, Serialize};

use crate::inference::{GenerationParameters, InferenceVariant};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinleyConfig {
    pub server: ServerConfig,
    pub identity: IdentityConfig,
    pub inference: InferenceConfig,
    pub store: StoreConfig,
}

/// Local HTTP listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// IAM token exchange endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub url: String,
    pub timeout_secs: u64,
    /// A cached token is refreshed this many seconds before it expires.
    pub refresh_skew_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            url: "https://iam.cloud.ibm.com/identity/token".to_string(),
            timeout_secs: 10,
            refresh_skew_secs: 60,
        }
    }
}

/// Hosted model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub variant: InferenceVariant,
    pub base_url: String,
    /// Value of the `version` query parameter.
    pub api_version: String,
    pub project_id: Option<String>,
    pub model_id: Option<String>,
    /// Required by the `deployment` variant.
    pub deployment_id: Option<String>,
    pub timeout_secs: u64,
    pub parameters: GenerationParameters,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            variant: InferenceVariant::default(),
            base_url: "https://us-south.ml.cloud.ibm.com".to_string(),
            api_version: "2023-05-29".to_string(),
            project_id: None,
            model_id: None,
            deployment_id: None,
            timeout_secs: 10,
            parameters: GenerationParameters::default(),
        }
    }
}

impl InferenceConfig {
    /// Names of the identifiers the selected variant still lacks.
    pub fn missing_identifiers(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        let mut missing = Vec::new();
        match self.variant {
            InferenceVariant::TextGeneration | InferenceVariant::ChatCompletion => {
                if blank(&self.project_id) {
                    missing.push("project_id");
                }
                if blank(&self.model_id) {
                    missing.push("model_id");
                }
            }
            InferenceVariant::Deployment => {
                if blank(&self.deployment_id) {
                    missing.push("deployment_id");
                }
            }
        }
        missing
    }
}

/// Hosted database/auth backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`. Finance routes are
    /// disabled when unset.
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 10,
        }
    }
}
