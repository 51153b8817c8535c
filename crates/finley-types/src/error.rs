use thiserror::Error;

/// Errors from acquiring an identity bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential is missing or empty; no network call was made.
    #[error("identity credential is not configured")]
    Configuration,

    #[error("identity exchange rejected: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("identity request failed: {0}")]
    Transport(String),

    #[error("invalid identity response: {0}")]
    Deserialization(String),
}

impl AuthError {
    /// HTTP status to mirror back to the caller of `/token`.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Upstream { status, .. } => *status,
            AuthError::Transport(_) => 502,
            _ => 500,
        }
    }
}

/// Errors from the hosted inference call.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference is not configured: {0}")]
    Configuration(String),

    #[error("could not authorize inference call: {0}")]
    Auth(#[from] AuthError),

    #[error("inference rejected: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("inference request failed: {0}")]
    Transport(String),

    #[error("invalid inference response: {0}")]
    Deserialization(String),
}

/// Errors from the hosted persistence/auth backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence backend is not configured")]
    NotConfigured,

    #[error("session is missing or expired")]
    Unauthorized,

    #[error("record not found")]
    NotFound,

    #[error("store rejected request: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("store request failed: {0}")]
    Transport(String),

    #[error("invalid store response: {0}")]
    Deserialization(String),
}

/// Input rejected before it reaches any network layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a valid amount greater than 0.")]
    InvalidAmount,

    #[error("Pick a date for this expense.")]
    MissingDate,

    #[error("Give this goal a name.")]
    MissingGoalName,

    #[error("Target amount must be greater than 0.")]
    InvalidTarget,

    #[error("Saved amount cannot be negative.")]
    NegativeAmount,

    #[error("Monthly income cannot be negative.")]
    NegativeIncome,

    #[error("Percentage '{0}' must be between 0 and 100.")]
    PercentOutOfRange(&'static str),

    #[error("Display name cannot be empty.")]
    EmptyDisplayName,
}

/// Errors surfaced by the finance service.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_mirrors_upstream() {
        let err = AuthError::Upstream {
            status: 400,
            body: "bad apikey".to_string(),
        };
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("bad apikey"));
        assert_eq!(AuthError::Configuration.status_code(), 500);
    }

    #[test]
    fn test_inference_error_wraps_auth_error() {
        let err: InferenceError = AuthError::Configuration.into();
        assert!(matches!(err, InferenceError::Auth(AuthError::Configuration)));
    }
}
