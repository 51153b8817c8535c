//! Model relay: forwards a chat message plus history to the hosted model
//! and always hands back a printable reply.
//!
//! - `prompt`: flattening a conversation into the text-generation prompt
//! - `InferenceBackend`: port for the one configured upstream contract
//! - `ModelRelay`: token acquisition, the upstream call and fallback replies

pub mod backend;
pub mod prompt;
pub mod service;

pub use backend::InferenceBackend;
pub use prompt::{chat_messages, flatten_prompt};
pub use service::{FALLBACK_REPLY, ModelRelay, NO_RESPONSE_REPLY, NOT_CONFIGURED_REPLY};
