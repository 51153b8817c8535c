//! TokenExchange trait definition.

use secrecy::SecretString;

use finley_types::error::AuthError;

/// Lifetime assumed when the identity endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// A freshly issued bearer token.
#[derive(Debug)]
pub struct TokenGrant {
    pub access_token: SecretString,
    /// Seconds until expiry as reported by the identity endpoint.
    pub expires_in_secs: Option<u64>,
}

/// Port for the identity endpoint's credential-for-token exchange.
///
/// Implementations live in finley-infra (e.g., `IamTokenExchange`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait TokenExchange: Send + Sync {
    /// Trade `api_key` for a bearer token.
    ///
    /// Any non-2xx response must surface as [`AuthError::Upstream`] carrying
    /// the status code and response body.
    fn exchange(
        &self,
        api_key: &SecretString,
    ) -> impl std::future::Future<Output = Result<TokenGrant, AuthError>> + Send;
}
