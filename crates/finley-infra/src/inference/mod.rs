//! watsonx.ai implementation of `InferenceBackend`.

pub mod types;
pub mod watsonx;

pub use types::InferenceReply;
pub use watsonx::WatsonxClient;
