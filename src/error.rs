//! Error types for cp-forge operations.
//!
//! Defines error types for the major subsystems:
//! - LLM API interactions
//! - Pipeline-fatal failures (sample extraction, test-suite format)
//!
//! Bounded-retry failures (a candidate that crashed, timed out, or produced
//! a wrong answer) are not errors: they consume one attempt and are recorded
//! in the attempt history instead.

use thiserror::Error;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal errors that halt a solve run.
///
/// When one of these is returned, the partial attempt history already
/// written to the workspace is left in place and the report is persisted
/// best-effort; there is no automatic resume.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The statement lacks a recognizable sample input or output block.
    #[error("Sample extraction failed: {0}")]
    Extraction(String),

    /// The test designer emitted a stream that violates the strict format.
    #[error("Generated test suite is malformed: {0}")]
    TestFormat(String),

    /// The test designer could not produce any stream at all.
    #[error("Test generation failed: {0}")]
    TestGeneration(String),

    /// Configuration could not be loaded, validated, or resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
