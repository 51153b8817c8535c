//! HTTP layer for Finley.
//!
//! Axum server exposing the chat proxy routes (`/token`, `/chat`) and the
//! enveloped finance API at `/api/v1/`, with CORS and request tracing.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
