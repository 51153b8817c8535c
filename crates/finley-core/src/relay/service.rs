//! ModelRelay -- the one canonical chat path.
//!
//! `relay` never fails: configuration gaps become [`NOT_CONFIGURED_REPLY`],
//! transport/upstream/decoding failures are logged and become
//! [`FALLBACK_REPLY`], and a 2xx answer without a reply field becomes
//! [`NO_RESPONSE_REPLY`].

use std::sync::Arc;
use std::time::Instant;

use secrecy::{ExposeSecret, SecretString};

use finley_types::chat::ConversationTurn;
use finley_types::error::{AuthError, InferenceError};

use crate::auth::{Clock, SystemClock, TokenCache, TokenExchange};

use super::backend::InferenceBackend;

pub const NOT_CONFIGURED_REPLY: &str = "Hi! I'm Finley, your financial friend! 🌟 To connect with the real AI assistant, please configure your VITE_AGENT_API_URL and VITE_AGENT_API_KEY in the .env file. For now, I'm here to help you explore budgeting, saving, and achieving your financial goals!";

pub const FALLBACK_REPLY: &str =
    "Hmm, I had trouble reaching the model. Double-check the IBM credentials in your .env.";

pub const NO_RESPONSE_REPLY: &str = "Sorry, no response.";

pub struct ModelRelay<B, E, C = SystemClock> {
    backend: B,
    tokens: Arc<TokenCache<E, C>>,
    api_key: Option<SecretString>,
}

impl<B, E, C> ModelRelay<B, E, C>
where
    B: InferenceBackend,
    E: TokenExchange,
    C: Clock,
{
    /// `tokens` is shared with the `/token` route so both reuse one cache.
    pub fn new(backend: B, tokens: Arc<TokenCache<E, C>>, api_key: Option<SecretString>) -> Self {
        Self {
            backend,
            tokens,
            api_key,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// True when a credential and every identifier the variant needs are set.
    pub fn is_configured(&self) -> bool {
        self.credential().is_some() && self.backend.missing_configuration().is_empty()
    }

    fn credential(&self) -> Option<&SecretString> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }

    /// Forward `message` and `history` to the model and return a trimmed reply.
    pub async fn relay(&self, message: &str, history: &[ConversationTurn]) -> String {
        match self.try_relay(message, history).await {
            Ok(Some(reply)) => {
                let reply = reply.trim();
                if reply.is_empty() {
                    NO_RESPONSE_REPLY.to_string()
                } else {
                    reply.to_string()
                }
            }
            Ok(None) => {
                tracing::warn!(
                    variant = %self.backend.variant(),
                    "inference response carried no reply field"
                );
                NO_RESPONSE_REPLY.to_string()
            }
            Err(InferenceError::Configuration(missing)) => {
                tracing::info!(missing = %missing, "model relay not configured");
                NOT_CONFIGURED_REPLY.to_string()
            }
            Err(InferenceError::Auth(AuthError::Configuration)) => {
                tracing::info!("model relay has no identity credential");
                NOT_CONFIGURED_REPLY.to_string()
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    variant = %self.backend.variant(),
                    "model relay failed, returning fallback reply"
                );
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn try_relay(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<Option<String>, InferenceError> {
        let missing = self.backend.missing_configuration();
        if !missing.is_empty() {
            return Err(InferenceError::Configuration(missing.join(", ")));
        }
        let api_key = self
            .credential()
            .ok_or(InferenceError::Auth(AuthError::Configuration))?;

        let bearer = self.tokens.get_token(api_key).await?;

        let start = Instant::now();
        let reply = self.backend.infer(&bearer, message, history).await?;
        tracing::debug!(
            variant = %self.backend.variant(),
            history_len = history.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "inference call completed"
        );
        Ok(reply)
    }
}
