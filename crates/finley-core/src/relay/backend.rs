//! InferenceBackend trait definition.

use secrecy::SecretString;

use finley_types::chat::ConversationTurn;
use finley_types::error::InferenceError;
use finley_types::inference::InferenceVariant;

/// Port for the hosted model endpoint.
///
/// One implementation speaks exactly one [`InferenceVariant`]; the variant
/// decides the request shape and which response fields hold the reply.
/// Implementations live in finley-infra (e.g., `WatsonxClient`).
pub trait InferenceBackend: Send + Sync {
    fn variant(&self) -> InferenceVariant;

    /// Configuration values the backend still lacks. Empty when ready.
    fn missing_configuration(&self) -> Vec<&'static str>;

    /// Call the model.
    ///
    /// `Ok(None)` means the upstream answered 2xx but none of the variant's
    /// known reply fields were present.
    fn infer(
        &self,
        bearer: &SecretString,
        message: &str,
        history: &[ConversationTurn],
    ) -> impl std::future::Future<Output = Result<Option<String>, InferenceError>> + Send;
}
