//! Persistence port for per-user finance records.
//!
//! The hosted backend enforces row-level security, so every call carries
//! the caller's own bearer session rather than a service credential.

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod tables;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use finley_types::error::StoreError;
use finley_types::profile::AuthUser;

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;

/// A row type stored in one hosted table.
pub trait TableRow: DeserializeOwned + Send + Sync + 'static {
    const TABLE: &'static str;
    /// Column holding the owning user's id.
    const OWNER_COLUMN: &'static str = "user_id";
    /// Column rows are ordered by, newest first.
    const ORDER_COLUMN: &'static str;

    type Insert: Serialize + Send + Sync;
    type Patch: Serialize + Send + Sync;

    /// Values the table fills in when an insert omits them.
    fn column_defaults() -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::new()
    }
}

/// An authenticated caller: who they are and the bearer they presented.
pub struct UserSession {
    pub user: AuthUser,
    pub access_token: SecretString,
}

impl UserSession {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

impl Clone for UserSession {
    fn clone(&self) -> Self {
        Self {
            user: self.user.clone(),
            access_token: SecretString::from(self.access_token.expose_secret().to_owned()),
        }
    }
}

impl std::fmt::Debug for UserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSession")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Port for the hosted database/auth service.
///
/// Implementations live in finley-infra (e.g., `SupabaseStore`); tests use
/// the in-memory `MemoryStore` behind the `test-support` feature.
pub trait FinanceStore: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    fn current_user(
        &self,
        access_token: &SecretString,
    ) -> impl std::future::Future<Output = Result<AuthUser, StoreError>> + Send;

    /// All rows of `T` owned by the session's user, newest first.
    fn select_by_owner<T: TableRow>(
        &self,
        session: &UserSession,
    ) -> impl std::future::Future<Output = Result<Vec<T>, StoreError>> + Send;

    /// Insert one row and return it as stored.
    fn insert<T: TableRow>(
        &self,
        session: &UserSession,
        row: &T::Insert,
    ) -> impl std::future::Future<Output = Result<T, StoreError>> + Send;

    /// Apply `patch` to the row with `id` and return the updated row.
    ///
    /// Fails with [`StoreError::NotFound`] when no row owned by the session
    /// has that id.
    fn update<T: TableRow>(
        &self,
        session: &UserSession,
        id: Uuid,
        patch: &T::Patch,
    ) -> impl std::future::Future<Output = Result<T, StoreError>> + Send;
}

impl<S: FinanceStore> FinanceStore for Arc<S> {
    fn current_user(
        &self,
        access_token: &SecretString,
    ) -> impl std::future::Future<Output = Result<AuthUser, StoreError>> + Send {
        (**self).current_user(access_token)
    }

    fn select_by_owner<T: TableRow>(
        &self,
        session: &UserSession,
    ) -> impl std::future::Future<Output = Result<Vec<T>, StoreError>> + Send {
        (**self).select_by_owner(session)
    }

    fn insert<T: TableRow>(
        &self,
        session: &UserSession,
        row: &T::Insert,
    ) -> impl std::future::Future<Output = Result<T, StoreError>> + Send {
        (**self).insert::<T>(session, row)
    }

    fn update<T: TableRow>(
        &self,
        session: &UserSession,
        id: Uuid,
        patch: &T::Patch,
    ) -> impl std::future::Future<Output = Result<T, StoreError>> + Send {
        (**self).update::<T>(session, id, patch)
    }
}
