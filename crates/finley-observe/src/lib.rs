//! Observability for Finley: tracing subscriber setup with optional
//! OpenTelemetry export, and the GenAI attribute names used on inference
//! spans.

pub mod genai_attrs;
pub mod tracing_setup;
