//! Shared domain types for Finley.
//!
//! This crate contains the types used across the Finley workspace:
//! chat turns, inference configuration, budgets, savings goals, expenses,
//! achievements, user profiles, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod achievement;
pub mod budget;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod expense;
pub mod inference;
pub mod profile;
