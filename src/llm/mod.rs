//! LLM integration for cp-forge.
//!
//! Provides an OpenAI-compatible chat client used by every agent stage, plus
//! model-identifier parsing and explicit credential resolution.
//!
//! Model identifiers follow the `provider:model` convention
//! (`openai:gpt-4o`, `google:gemini-2.0-flash`); a bare model name defaults
//! to the `openai` provider. Credentials resolve with explicit precedence:
//! environment variable override, then config-file value, then a fatal
//! configuration error — there is no guessed default.

pub mod chat;
pub mod model_spec;

pub use chat::{
    ChatClient, Choice, GenerationRequest, GenerationResponse, LlmProvider, Message, Usage,
};
pub use model_spec::{ModelSpec, ProviderKind};
