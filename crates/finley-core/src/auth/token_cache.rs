//! Expiry-aware bearer-token cache with a single-flight guard.
//!
//! Each credential gets its own slot: a `tokio::sync::Mutex` around the
//! cached token. A caller holds the slot lock across the exchange call, so
//! concurrent callers for the same credential queue behind one in-flight
//! exchange and then reuse its result instead of issuing a second token.
//! Slots are keyed by a SHA-256 fingerprint so raw credentials are never
//! used as map keys.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use finley_types::error::AuthError;

use super::clock::{Clock, SystemClock};
use super::exchange::{DEFAULT_EXPIRES_IN_SECS, TokenExchange};

/// Default margin before expiry at which a token is treated as stale.
pub const DEFAULT_REFRESH_SKEW: Duration = Duration::from_secs(60);

/// A bearer token and the instant it expires.
pub struct CachedToken {
    pub value: SecretString,
    pub expires_at_ms: i64,
}

impl CachedToken {
    /// True while `now < expires_at - skew`.
    pub fn is_fresh(&self, now_ms: i64, skew_ms: i64) -> bool {
        !self.value.expose_secret().is_empty() && now_ms < self.expires_at_ms - skew_ms
    }

    /// Whole seconds left before expiry, never negative.
    pub fn expires_in_secs(&self, now_ms: i64) -> u64 {
        ((self.expires_at_ms - now_ms) / 1000).max(0) as u64
    }
}

impl Clone for CachedToken {
    fn clone(&self) -> Self {
        Self {
            value: SecretString::from(self.value.expose_secret().to_owned()),
            expires_at_ms: self.expires_at_ms,
        }
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("value", &"[REDACTED]")
            .field("expires_at_ms", &self.expires_at_ms)
            .finish()
    }
}

type Slot = Arc<Mutex<Option<CachedToken>>>;

/// Memoizes bearer tokens issued by a [`TokenExchange`].
///
/// Owned by whatever composes the server (see `AppState`), never a global.
pub struct TokenCache<E, C = SystemClock> {
    exchange: E,
    clock: C,
    refresh_skew_ms: i64,
    slots: DashMap<String, Slot>,
}

impl<E: TokenExchange> TokenCache<E, SystemClock> {
    pub fn new(exchange: E) -> Self {
        Self::with_clock(exchange, SystemClock)
    }
}

impl<E: TokenExchange, C: Clock> TokenCache<E, C> {
    pub fn with_clock(exchange: E, clock: C) -> Self {
        Self {
            exchange,
            clock,
            refresh_skew_ms: DEFAULT_REFRESH_SKEW.as_millis() as i64,
            slots: DashMap::new(),
        }
    }

    /// Override how long before expiry a token is refreshed.
    pub fn with_refresh_skew(mut self, skew: Duration) -> Self {
        self.refresh_skew_ms = skew.as_millis() as i64;
        self
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Return a valid bearer token for `api_key`.
    ///
    /// Fails with [`AuthError::Configuration`] for an empty credential
    /// before any network call.
    pub async fn get_token(&self, api_key: &SecretString) -> Result<SecretString, AuthError> {
        self.get_cached_token(api_key).await.map(|token| token.value)
    }

    /// Like [`get_token`](Self::get_token) but also reports the expiry.
    ///
    /// A failed exchange leaves the slot untouched: a previously cached
    /// token stays in place and the next call retries once it is stale.
    pub async fn get_cached_token(&self, api_key: &SecretString) -> Result<CachedToken, AuthError> {
        let credential = api_key.expose_secret();
        if credential.trim().is_empty() {
            return Err(AuthError::Configuration);
        }

        let slot = self
            .slots
            .entry(fingerprint(credential))
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone();

        let mut cached = slot.lock().await;

        let now = self.clock.now_ms();
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(now, self.refresh_skew_ms) {
                return Ok(token.clone());
            }
        }

        tracing::debug!("bearer token missing or stale, exchanging credential");
        let grant = self.exchange.exchange(api_key).await.inspect_err(|e| {
            tracing::warn!(error = %e, "token exchange failed");
        })?;

        let expires_in = grant.expires_in_secs.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let token = CachedToken {
            value: grant.access_token,
            expires_at_ms: now + (expires_in as i64) * 1000,
        };
        tracing::info!(expires_in_secs = expires_in, "cached new bearer token");

        *cached = Some(token.clone());
        Ok(token)
    }

    /// Drop every cached token.
    ///
    /// Slots are collected first so no map shard stays locked while a slot
    /// mutex is awaited.
    pub async fn clear(&self) {
        let slots: Vec<Slot> = self.slots.iter().map(|entry| entry.value().clone()).collect();
        for slot in slots {
            *slot.lock().await = None;
        }
    }
}

fn fingerprint(credential: &str) -> String {
    format!("{:x}", Sha256::digest(credential.as_bytes()))
}
