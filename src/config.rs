//! Run configuration for the solve pipeline.
//!
//! Configuration is an explicit struct deserialized from a YAML file: per
//! stage model identifiers, execution limits and temperature schedules,
//! workspace file names, and the optional final-judge settings. API keys
//! resolve with environment-variable precedence (see [`crate::llm`]).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::llm::ProviderKind;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// A model identifier names an unknown provider.
    #[error("Unsupported provider '{0}': use openai:* or google:* model identifiers")]
    UnsupportedProvider(String),

    /// No API key available for a provider in either the environment or the
    /// configuration file.
    #[error("Missing API key for provider '{provider}': set {env_var} or api_keys.{provider}")]
    MissingApiKey { provider: String, env_var: String },

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Per-stage model identifiers (`provider:model` strings).
#[derive(Debug, Clone, Deserialize)]
pub struct StageModels {
    /// Model for sample input/output extraction.
    pub sample_agent: String,
    /// Model for test-case design.
    pub tester_agent: String,
    /// Model for brute-force solution generation.
    pub brute_agent: String,
    /// Model for optimal solution generation.
    pub optimal_agent: String,
    /// Model for the optional final judge; judging is skipped when absent.
    #[serde(default)]
    pub final_judge_agent: Option<String>,
}

/// API keys from the configuration file. Environment variables take
/// precedence; empty values count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeys {
    /// OpenAI API key.
    #[serde(default)]
    pub openai: Option<String>,
    /// Google API key.
    #[serde(default)]
    pub google: Option<String>,
}

impl ApiKeys {
    /// Returns the file-configured key for a provider, if any.
    pub fn for_provider(&self, provider: ProviderKind) -> Option<&str> {
        match provider {
            ProviderKind::OpenAi => self.openai.as_deref(),
            ProviderKind::Google => self.google.as_deref(),
        }
    }
}

/// Execution limits and sampling schedules for the generator loops.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Wall-clock timeout for each candidate execution, in seconds.
    pub timeout_seconds: u64,
    /// Attempt budget for the brute-force loop.
    pub max_brute_attempts: u32,
    /// Attempt budget for the optimal loop.
    pub max_optimal_attempts: u32,
    /// Temperatures cycled over brute attempts.
    pub brute_temperatures: Vec<f64>,
    /// Temperatures cycled over optimal attempts.
    pub optimal_temperatures: Vec<f64>,
    /// Interpreter used to run generated candidates.
    pub interpreter: String,
    /// Keep searching after the first accepted optimal attempt, recording
    /// every match until the budget is exhausted.
    pub collect_all_matches: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            max_brute_attempts: 3,
            max_optimal_attempts: 5,
            brute_temperatures: vec![
                0.25, 0.23, 0.21, 0.19, 0.17, 0.15, 0.13, 0.11, 0.09, 0.07, 0.05, 0.03,
            ],
            optimal_temperatures: vec![
                0.30, 0.27, 0.24, 0.21, 0.18, 0.15, 0.12, 0.09, 0.06, 0.03,
            ],
            interpreter: "python3".to_string(),
            collect_all_matches: false,
        }
    }
}

/// Output location settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving all run artifacts.
    pub workspace_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from("workspace"),
        }
    }
}

/// Names of the main artifact files inside the workspace.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileNames {
    /// Generated test-input stream.
    pub test_inputs: String,
    /// Latest brute-force solution source.
    pub brute_solution: String,
    /// Brute-force outputs over the generated tests.
    pub brute_outputs: String,
    /// Latest optimal solution source.
    pub optimal_solution: String,
    /// Optimal outputs over the generated tests.
    pub optimal_outputs: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            test_inputs: "test_inputs.txt".to_string(),
            brute_solution: "brute.py".to_string(),
            brute_outputs: "brute_outputs.txt".to_string(),
            optimal_solution: "optimal.py".to_string(),
            optimal_outputs: "optimal_outputs.txt".to_string(),
        }
    }
}

/// Final-judge settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FinalJudgeConfig {
    /// Whether to run the final judge over accepted optimal attempts.
    pub enable: bool,
    /// Candidates per judging group.
    pub group_size: usize,
}

impl Default for FinalJudgeConfig {
    fn default() -> Self {
        Self {
            enable: false,
            group_size: 4,
        }
    }
}

/// Complete configuration for a solve run.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Per-stage model identifiers.
    pub models: StageModels,
    /// API keys (environment variables take precedence).
    #[serde(default)]
    pub api_keys: ApiKeys,
    /// Execution limits and temperature schedules.
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Output location settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Artifact file names.
    #[serde(default)]
    pub files: FileNames,
    /// Final-judge settings.
    #[serde(default)]
    pub final_judge: FinalJudgeConfig,
}

impl RunConfig {
    /// Loads and validates configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.execution.max_brute_attempts == 0 {
            return Err(ConfigError::ValidationFailed(
                "execution.max_brute_attempts must be greater than 0".to_string(),
            ));
        }

        if self.execution.max_optimal_attempts == 0 {
            return Err(ConfigError::ValidationFailed(
                "execution.max_optimal_attempts must be greater than 0".to_string(),
            ));
        }

        if self.execution.timeout_seconds == 0 {
            return Err(ConfigError::ValidationFailed(
                "execution.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.execution.brute_temperatures.is_empty()
            || self.execution.optimal_temperatures.is_empty()
        {
            return Err(ConfigError::ValidationFailed(
                "temperature lists must not be empty".to_string(),
            ));
        }

        if self.execution.interpreter.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "execution.interpreter cannot be empty".to_string(),
            ));
        }

        for (stage, model) in [
            ("sample_agent", &self.models.sample_agent),
            ("tester_agent", &self.models.tester_agent),
            ("brute_agent", &self.models.brute_agent),
            ("optimal_agent", &self.models.optimal_agent),
        ] {
            if model.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "models.{} cannot be empty",
                    stage
                )));
            }
        }

        if self.final_judge.enable {
            if self.final_judge.group_size == 0 {
                return Err(ConfigError::ValidationFailed(
                    "final_judge.group_size must be greater than 0".to_string(),
                ));
            }
            if self.models.final_judge_agent.is_none() {
                return Err(ConfigError::ValidationFailed(
                    "final_judge.enable requires models.final_judge_agent".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Populates missing process environment variables from a `KEY=VALUE` file.
///
/// Lines that are empty, start with `#`, or lack `=` are skipped; existing
/// environment variables are never overridden. A missing file is not an
/// error.
pub fn load_env_file(path: impl AsRef<Path>) {
    let content = match std::fs::read_to_string(path.as_ref()) {
        Ok(content) => content,
        Err(_) => return,
    };

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if !key.is_empty() && !value.is_empty() && std::env::var_os(key).is_none() {
            std::env::set_var(key, value);
        }
    }
}
