//! CLI command definitions for cp-forge.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use crate::agents::{SampleExtractorAgent, SampleKind};
use crate::config::{load_env_file, RunConfig};
use crate::pipeline::{Orchestrator, StageProviders};

/// Default configuration file path.
const DEFAULT_CONFIG: &str = "config.yaml";

/// Default environment file consulted for API keys.
const DEFAULT_ENV_FILE: &str = ".env";

/// Multi-agent competitive-programming solution forge.
#[derive(Parser)]
#[command(name = "cp-forge")]
#[command(about = "Generate and validate competitive-programming solutions with LLM agents")]
#[command(version)]
#[command(
    long_about = "cp-forge chains LLM agents to solve a competitive programming problem:\n\
                  extract the official sample, generate a brute-force reference solution,\n\
                  design edge-case tests, and search for an efficient solution validated\n\
                  against the reference.\n\nExample usage:\n  cp-forge solve problem.txt --config config.yaml"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run the full solve pipeline on a problem statement.
    #[command(alias = "run")]
    Solve(SolveArgs),

    /// Extract the official sample input/output from a statement and print
    /// them, without running the pipeline.
    Extract(ExtractArgs),
}

/// Arguments for `cp-forge solve`.
#[derive(Parser, Debug)]
pub struct SolveArgs {
    /// Path to the problem statement text file.
    pub problem: PathBuf,

    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// KEY=VALUE environment file consulted for missing API keys.
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Override the workspace directory from the configuration.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable the final judge even if the configuration disables it.
    #[arg(long, conflicts_with = "no_judge")]
    pub judge: bool,

    /// Disable the final judge even if the configuration enables it.
    #[arg(long)]
    pub no_judge: bool,

    /// Print the full report as JSON to stdout.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `cp-forge extract`.
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Path to the problem statement text file.
    pub problem: PathBuf,

    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// KEY=VALUE environment file consulted for missing API keys.
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,
}

/// Parse CLI arguments without running the command.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Solve(args) => run_solve_command(args).await?,
        Commands::Extract(args) => run_extract_command(args).await?,
    }
    Ok(())
}

async fn run_solve_command(args: SolveArgs) -> anyhow::Result<()> {
    load_env_file(&args.env_file);

    let mut config = RunConfig::load(&args.config)?;
    if let Some(output) = args.output {
        config.output.workspace_dir = output;
    }
    if args.judge {
        config.final_judge.enable = true;
    }
    if args.no_judge {
        config.final_judge.enable = false;
    }
    config.validate()?;

    let statement = std::fs::read_to_string(&args.problem)?;

    let providers = StageProviders::from_config(&config)?;
    let orchestrator = Orchestrator::new(config, providers)?;

    info!(problem = %args.problem.display(), "Starting solve run");
    let report = orchestrator.solve(&statement).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.success {
        info!(
            total_attempts = report.total_attempts,
            results = %orchestrator.workspace().results().display(),
            "Optimal solution found"
        );
    } else {
        warn!(
            total_attempts = report.total_attempts,
            results = %orchestrator.workspace().results().display(),
            "No accepted optimal solution within budget"
        );
    }

    Ok(())
}

async fn run_extract_command(args: ExtractArgs) -> anyhow::Result<()> {
    load_env_file(&args.env_file);

    let config = RunConfig::load(&args.config)?;
    let providers = StageProviders::from_config(&config)?;
    let agent = SampleExtractorAgent::new(providers.sample);

    let statement = std::fs::read_to_string(&args.problem)?;

    let input = agent.extract(&statement, SampleKind::Input).await?;
    let output = agent.extract(&statement, SampleKind::Output).await?;

    println!("=== SAMPLE INPUT ===\n{}\n", input);
    println!("=== SAMPLE OUTPUT ===\n{}", output);

    Ok(())
}
