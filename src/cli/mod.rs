//! Command-line interface for cp-forge.
//!
//! Provides the solve pipeline entry point and a standalone sample
//! extraction command.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli, Commands};
