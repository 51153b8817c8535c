//! OpenTelemetry GenAI Semantic Convention attribute constants.
//!
//! Field names for the span wrapped around each hosted-model call. Span
//! naming convention: `"{operation} {model}"` (e.g., `"text_completion ibm/granite-3-8b-instruct"`).

// --- Required attributes ---

/// The name of the operation being performed (e.g., "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "ibm.watsonx.ai").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

/// The model ID requested.
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

pub const GEN_AI_REQUEST_TOP_P: &str = "gen_ai.request.top_p";

pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

/// Tokens consumed by the prompt, when the provider reports it.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// Tokens generated, when the provider reports it.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// Why generation stopped (e.g., "eos_token", "stop_sequence").
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

// --- Operation name values ---

/// Message-array chat call.
pub const OP_CHAT: &str = "chat";

/// Prompt-in, text-out generation call.
pub const OP_TEXT_COMPLETION: &str = "text_completion";

/// Call to a deployed AI service.
pub const OP_INVOKE_AGENT: &str = "invoke_agent";

// --- Provider name values ---

pub const PROVIDER_WATSONX: &str = "ibm.watsonx.ai";
