//! Business logic and port trait definitions for Finley.
//!
//! This crate defines the "ports" that the infrastructure layer implements
//! (token exchange, inference backend, finance store) together with the
//! logic that sits on top of them: the bearer-token cache, the model
//! relay, budget math and the finance service. It depends only on
//! `finley-types` -- never on `finley-infra` or any HTTP crate.

pub mod achievement;
pub mod auth;
pub mod budget;
pub mod expense;
pub mod finance;
pub mod relay;
pub mod store;
