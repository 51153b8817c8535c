//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the HTTP server. Core services are generic over their ports; AppState
//! pins them to the infra implementations.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use finley_core::auth::TokenCache;
use finley_core::finance::FinanceService;
use finley_core::relay::ModelRelay;
use finley_core::store::{FinanceStore, TableRow, UserSession};
use finley_infra::config::resolve_config;
use finley_infra::identity::IamTokenExchange;
use finley_infra::inference::WatsonxClient;
use finley_infra::secret::EnvCredentials;
use finley_infra::store::SupabaseStore;
use finley_types::config::FinleyConfig;
use finley_types::error::StoreError;
use finley_types::profile::AuthUser;

pub type ConcreteTokenCache = TokenCache<IamTokenExchange>;

pub type ConcreteRelay = ModelRelay<WatsonxClient, IamTokenExchange>;

pub type ConcreteFinanceService = FinanceService<StoreBackend>;

/// The persistence backend finance routes run against.
pub enum StoreBackend {
    Supabase(SupabaseStore),
    #[cfg(test)]
    Memory(Arc<finley_core::store::MemoryStore>),
}

impl FinanceStore for StoreBackend {
    async fn current_user(&self, access_token: &SecretString) -> Result<AuthUser, StoreError> {
        match self {
            StoreBackend::Supabase(s) => s.current_user(access_token).await,
            #[cfg(test)]
            StoreBackend::Memory(m) => m.current_user(access_token).await,
        }
    }

    async fn select_by_owner<T: TableRow>(&self, session: &UserSession) -> Result<Vec<T>, StoreError> {
        match self {
            StoreBackend::Supabase(s) => s.select_by_owner(session).await,
            #[cfg(test)]
            StoreBackend::Memory(m) => m.select_by_owner(session).await,
        }
    }

    async fn insert<T: TableRow>(&self, session: &UserSession, row: &T::Insert) -> Result<T, StoreError> {
        match self {
            StoreBackend::Supabase(s) => s.insert::<T>(session, row).await,
            #[cfg(test)]
            StoreBackend::Memory(m) => m.insert::<T>(session, row).await,
        }
    }

    async fn update<T: TableRow>(
        &self,
        session: &UserSession,
        id: Uuid,
        patch: &T::Patch,
    ) -> Result<T, StoreError> {
        match self {
            StoreBackend::Supabase(s) => s.update::<T>(session, id, patch).await,
            #[cfg(test)]
            StoreBackend::Memory(m) => m.update::<T>(session, id, patch).await,
        }
    }
}

/// Shared application state.
///
/// Cloned into every axum handler; all members are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FinleyConfig>,
    pub credentials: Arc<EnvCredentials>,
    /// Shared by `/token` and the relay so both reuse one cached token.
    pub tokens: Arc<ConcreteTokenCache>,
    pub relay: Arc<ConcreteRelay>,
    /// `None` when no persistence backend is configured.
    pub finance: Option<Arc<ConcreteFinanceService>>,
}

impl AppState {
    /// Load configuration and environment secrets, then wire services.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = resolve_config(config_path).await;
        Self::from_parts(config, EnvCredentials::from_env())
    }

    pub fn from_parts(config: FinleyConfig, credentials: EnvCredentials) -> anyhow::Result<Self> {
        let exchange = IamTokenExchange::new(&config.identity)?;
        let tokens = Arc::new(
            TokenCache::new(exchange)
                .with_refresh_skew(Duration::from_secs(config.identity.refresh_skew_secs)),
        );

        let backend = WatsonxClient::new(config.inference.clone())?;
        let api_key = credentials
            .agent_api_key
            .as_ref()
            .map(|k| SecretString::from(k.expose_secret().to_owned()));
        let relay = ModelRelay::new(backend, Arc::clone(&tokens), api_key);
        if !relay.is_configured() {
            tracing::warn!(
                variant = %config.inference.variant,
                missing = ?config.inference.missing_identifiers(),
                "inference is not fully configured; chat will return the setup reply"
            );
        }

        let finance = build_finance(&config, &credentials)?;

        Ok(Self {
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            tokens,
            relay: Arc::new(relay),
            finance,
        })
    }
}

fn build_finance(
    config: &FinleyConfig,
    credentials: &EnvCredentials,
) -> anyhow::Result<Option<Arc<ConcreteFinanceService>>> {
    if config.store.url.is_none() {
        tracing::info!("no store url configured; finance routes disabled");
        return Ok(None);
    }
    let Some(anon_key) = credentials.supabase_anon_key.as_ref() else {
        tracing::warn!("store url set but SUPABASE_ANON_KEY is missing; finance routes disabled");
        return Ok(None);
    };
    let store = SupabaseStore::new(
        &config.store,
        SecretString::from(anon_key.expose_secret().to_owned()),
    )?;
    Ok(Some(Arc::new(FinanceService::new(StoreBackend::Supabase(store)))))
}
