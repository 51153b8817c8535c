//! Configuration loader for Finley.
//!
//! Reads `config.toml` (by default `{config_dir}/finley/config.toml`) into
//! [`FinleyConfig`], falling back to defaults when the file is missing or
//! malformed, then layers environment overrides on top.

use std::path::{Path, PathBuf};

use finley_types::config::FinleyConfig;
use finley_types::inference::InferenceVariant;

/// `{config_dir}/finley/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("finley").join("config.toml"))
}

/// Load configuration from `config_path`.
///
/// - Missing file: returns [`FinleyConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_config(config_path: &Path) -> FinleyConfig {
    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return FinleyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return FinleyConfig::default();
        }
    };

    match toml::from_str::<FinleyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            FinleyConfig::default()
        }
    }
}

/// First non-blank value among `keys`.
fn first_set(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Apply environment overrides read through `lookup`.
///
/// Frontend-style `VITE_`-prefixed names are accepted as fallbacks for the
/// inference identifiers. Values that fail to parse are logged and ignored.
pub fn apply_env_overrides(config: &mut FinleyConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host) = first_set(&lookup, &["FINLEY_HOST"]) {
        config.server.host = host;
    }
    if let Some(port) = first_set(&lookup, &["FINLEY_PORT", "PORT"]) {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(err) => tracing::warn!("Ignoring FINLEY_PORT={port}: {err}"),
        }
    }
    if let Some(url) = first_set(&lookup, &["IAM_URL"]) {
        config.identity.url = url;
    }
    if let Some(url) = first_set(&lookup, &["AGENT_API_URL", "VITE_AGENT_API_URL"]) {
        config.inference.base_url = url;
    }
    if let Some(id) = first_set(&lookup, &["IBM_PROJECT_ID", "VITE_IBM_PROJECT_ID"]) {
        config.inference.project_id = Some(id);
    }
    if let Some(id) = first_set(&lookup, &["IBM_MODEL_ID", "VITE_IBM_MODEL_ID"]) {
        config.inference.model_id = Some(id);
    }
    if let Some(id) = first_set(&lookup, &["IBM_DEPLOYMENT_ID", "VITE_IBM_DEPLOYMENT_ID"]) {
        config.inference.deployment_id = Some(id);
    }
    if let Some(variant) = first_set(&lookup, &["FINLEY_INFERENCE_VARIANT"]) {
        match variant.parse::<InferenceVariant>() {
            Ok(variant) => config.inference.variant = variant,
            Err(err) => tracing::warn!("Ignoring FINLEY_INFERENCE_VARIANT: {err}"),
        }
    }
    if let Some(url) = first_set(&lookup, &["SUPABASE_URL", "VITE_SUPABASE_URL"]) {
        config.store.url = Some(url);
    }
}

/// Load `config_path` (or the default location) and apply process
/// environment overrides.
pub async fn resolve_config(config_path: Option<&Path>) -> FinleyConfig {
    let mut config = match config_path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => load_config(&path).await,
        None => FinleyConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}
