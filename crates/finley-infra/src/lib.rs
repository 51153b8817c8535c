//! Infrastructure layer for Finley.
//!
//! Contains implementations of the ports defined in `finley-core`: the IAM
//! token exchange, the watsonx.ai inference client, and the Supabase-backed
//! finance store, plus configuration and environment-secret loading.

pub mod config;
pub mod identity;
pub mod inference;
pub mod secret;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
