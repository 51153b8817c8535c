//! SupabaseStore -- GoTrue for identity, PostgREST for rows.
//!
//! Requests carry the project's anon key as `apikey` and the caller's own
//! JWT as the bearer, so row-level security scopes every query to that
//! user. Owner filters are still sent explicitly.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use finley_core::store::{FinanceStore, TableRow, UserSession};
use finley_types::config::StoreConfig;
use finley_types::error::StoreError;
use finley_types::profile::AuthUser;

const PREFER_REPRESENTATION: &str = "return=representation";

pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    anon_key: SecretString,
}

impl SupabaseStore {
    /// Fails with [`StoreError::NotConfigured`] when no project URL is set.
    pub fn new(config: &StoreConfig, anon_key: SecretString) -> Result<Self, StoreError> {
        let base_url = config
            .url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or(StoreError::NotConfigured)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            anon_key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn request(&self, method: reqwest::Method, url: String, bearer: &SecretString) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(bearer.expose_secret())
            .header(ACCEPT, "application/json")
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(StoreError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "store request rejected");
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Deserialization(e.to_string()))
    }

    async fn send<T: DeserializeOwned>(builder: reqwest::RequestBuilder) -> Result<T, StoreError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Self::read(response).await
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

impl FinanceStore for SupabaseStore {
    async fn current_user(&self, access_token: &SecretString) -> Result<AuthUser, StoreError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        Self::send(self.request(reqwest::Method::GET, url, access_token)).await
    }

    async fn select_by_owner<T: TableRow>(&self, session: &UserSession) -> Result<Vec<T>, StoreError> {
        let order = format!("{}.desc", T::ORDER_COLUMN);
        let owner = eq(session.user_id());
        let builder = self
            .request(reqwest::Method::GET, self.table_url(T::TABLE), &session.access_token)
            .query(&[
                ("select", "*"),
                (T::OWNER_COLUMN, owner.as_str()),
                ("order", order.as_str()),
            ]);
        let rows: Vec<T> = Self::send(builder).await?;
        tracing::debug!(table = T::TABLE, rows = rows.len(), "selected rows");
        Ok(rows)
    }

    async fn insert<T: TableRow>(&self, session: &UserSession, row: &T::Insert) -> Result<T, StoreError> {
        let builder = self
            .request(reqwest::Method::POST, self.table_url(T::TABLE), &session.access_token)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(row);
        let rows: Vec<T> = Self::send(builder).await?;
        rows.into_iter().next().ok_or_else(|| {
            StoreError::Deserialization(format!("insert into {} returned no rows", T::TABLE))
        })
    }

    async fn update<T: TableRow>(
        &self,
        session: &UserSession,
        id: Uuid,
        patch: &T::Patch,
    ) -> Result<T, StoreError> {
        let id_filter = eq(id);
        let owner = eq(session.user_id());
        let mut filters = vec![("id", id_filter.as_str())];
        if T::OWNER_COLUMN != "id" {
            filters.push((T::OWNER_COLUMN, owner.as_str()));
        }
        let builder = self
            .request(reqwest::Method::PATCH, self.table_url(T::TABLE), &session.access_token)
            .query(&filters)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(patch);
        let rows: Vec<T> = Self::send(builder).await?;
        rows.into_iter().next().ok_or(StoreError::NotFound)
    }
}
