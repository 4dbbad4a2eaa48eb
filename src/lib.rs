//! cp-forge: multi-agent competitive-programming solution forge.
//!
//! This library orchestrates a sequence of LLM agents that extract sample
//! cases from a problem statement, generate a brute-force reference
//! solution, design edge-case tests, and search for an efficient solution
//! validated against the reference.

// Core modules
pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod runner;
pub mod utils;
pub mod workspace;

// Re-export commonly used error types
pub use error::{LlmError, SolveError};
