//! Error types for the agent stages.

use thiserror::Error;

/// Errors that can occur during agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Error from the LLM provider.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Error parsing the LLM response.
    #[error("Failed to parse LLM response: {0}")]
    ResponseParse(String),

    /// The LLM returned no content.
    #[error("Empty LLM response")]
    EmptyResponse,

    /// The statement lacks the requested sample block.
    #[error("Statement lacks a recognizable sample {kind} block")]
    MissingSample { kind: String },

    /// The response does not resemble runnable code.
    #[error("Model response does not look like runnable code; it must be raw code only")]
    NotCode,
}

impl From<crate::error::LlmError> for AgentError {
    fn from(err: crate::error::LlmError) -> Self {
        AgentError::Llm(err.to_string())
    }
}

/// Result type alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;
