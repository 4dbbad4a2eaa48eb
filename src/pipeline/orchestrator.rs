//! Sequential solve pipeline.
//!
//! Stages run strictly in order: sample extraction, the brute-force loop
//! validated against the official sample, edge-case test design, the brute
//! run over the generated tests, the optimal loop validated against the
//! brute outputs, and the optional final judge. One LLM call and one
//! subprocess run at a time; the only shared state is the workspace.
//!
//! A brute candidate that passes the sample but fails on the generated
//! tests re-enters the brute loop with that failure as feedback, against
//! the same attempt budget.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::agents::{
    AgentError, BruteSolverAgent, FinalJudgeAgent, OptimalSolverAgent, SampleExtractorAgent,
    SampleKind, SolutionGenerator, TestDesignerAgent,
};
use crate::config::RunConfig;
use crate::error::SolveError;
use crate::llm::{LlmProvider, ModelSpec};
use crate::pipeline::gen_loop::{GeneratorLoop, LoopOutcome};
use crate::pipeline::report::{FinalJudgeSummary, GroupResult, SolveReport};
use crate::pipeline::types::{Attempt, SampleIo};
use crate::runner::{CodeExecutor, ExecutorError};
use crate::workspace::Workspace;

/// Per-stage LLM providers.
///
/// Built from configuration for real runs; tests inject their own.
pub struct StageProviders {
    /// Provider for sample extraction.
    pub sample: Arc<dyn LlmProvider>,
    /// Provider for test-case design.
    pub tester: Arc<dyn LlmProvider>,
    /// Provider for brute-force generation.
    pub brute: Arc<dyn LlmProvider>,
    /// Provider for optimal generation.
    pub optimal: Arc<dyn LlmProvider>,
    /// Provider for the final judge, when configured.
    pub judge: Option<Arc<dyn LlmProvider>>,
}

impl StageProviders {
    /// Resolves every configured stage model into a chat client.
    ///
    /// # Errors
    ///
    /// Fails when a model identifier is malformed or no API key is
    /// available for its provider.
    pub fn from_config(config: &RunConfig) -> Result<Self, SolveError> {
        let client = |identifier: &str| -> Result<Arc<dyn LlmProvider>, SolveError> {
            let spec = ModelSpec::parse(identifier)?;
            let file_key = config.api_keys.for_provider(spec.provider);
            Ok(Arc::new(spec.client(file_key)?))
        };

        let judge = match &config.models.final_judge_agent {
            Some(identifier) => Some(client(identifier)?),
            None => None,
        };

        Ok(Self {
            sample: client(&config.models.sample_agent)?,
            tester: client(&config.models.tester_agent)?,
            brute: client(&config.models.brute_agent)?,
            optimal: client(&config.models.optimal_agent)?,
            judge,
        })
    }
}

/// Drives a full solve run.
pub struct Orchestrator {
    config: RunConfig,
    workspace: Workspace,
    sample_agent: SampleExtractorAgent,
    tester_agent: TestDesignerAgent,
    brute_agent: Arc<dyn SolutionGenerator>,
    optimal_agent: Arc<dyn SolutionGenerator>,
    judge_agent: Option<FinalJudgeAgent>,
    executor: CodeExecutor,
}

impl Orchestrator {
    /// Creates the orchestrator and its workspace directory.
    pub fn new(config: RunConfig, providers: StageProviders) -> Result<Self, SolveError> {
        let workspace = Workspace::create(&config.output.workspace_dir, config.files.clone())?;
        let executor = CodeExecutor::new(
            config.execution.interpreter.clone(),
            Duration::from_secs(config.execution.timeout_seconds),
        );

        Ok(Self {
            sample_agent: SampleExtractorAgent::new(providers.sample),
            tester_agent: TestDesignerAgent::new(providers.tester),
            brute_agent: Arc::new(BruteSolverAgent::new(providers.brute)),
            optimal_agent: Arc::new(OptimalSolverAgent::new(providers.optimal)),
            judge_agent: providers.judge.map(FinalJudgeAgent::new),
            executor,
            workspace,
            config,
        })
    }

    /// The run workspace.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Runs the full pipeline for one problem statement.
    ///
    /// Returns the consolidated report; `report.success` distinguishes a
    /// run that exhausted its budgets from one that found a solution. The
    /// report is persisted to the workspace even when a stage fails
    /// fatally.
    pub async fn solve(&self, statement: &str) -> Result<SolveReport, SolveError> {
        let mut report = SolveReport::new(statement);
        let result = self.run_stages(statement, &mut report).await;

        report.update_totals();
        if let Err(e) = report.persist(&self.workspace.results()) {
            warn!(error = %e, "Failed to persist results");
        }

        result.map(|_| report)
    }

    async fn run_stages(
        &self,
        statement: &str,
        report: &mut SolveReport,
    ) -> Result<(), SolveError> {
        let sample = self.extract_samples(statement).await?;
        report.sample_input = sample.input.clone();
        report.sample_output = sample.output.clone();

        let brute_ok = self.run_brute_stage(statement, &sample, report).await?;
        if !brute_ok {
            info!(
                max_attempts = self.config.execution.max_brute_attempts,
                "No working brute-force solution within budget"
            );
            return Ok(());
        }

        self.run_optimal_stage(statement, report).await?;

        if self.config.final_judge.enable {
            self.run_final_judge(statement, report).await?;
        }

        Ok(())
    }

    /// Extracts and persists both sample blocks; missing blocks are fatal.
    async fn extract_samples(&self, statement: &str) -> Result<SampleIo, SolveError> {
        info!("Extracting official sample cases");

        let input = self
            .sample_agent
            .extract(statement, SampleKind::Input)
            .await
            .map_err(|e| SolveError::Extraction(e.to_string()))?;
        let output = self
            .sample_agent
            .extract(statement, SampleKind::Output)
            .await
            .map_err(|e| SolveError::Extraction(e.to_string()))?;

        let sample = SampleIo {
            input: format!("{}\n", input.trim_end()),
            output: format!("{}\n", output.trim_end()),
        };
        self.workspace
            .write(self.workspace.sample_input(), &sample.input)?;
        self.workspace
            .write(self.workspace.sample_output(), &sample.output)?;

        Ok(sample)
    }

    /// Runs the brute-force loop until a candidate passes both the sample
    /// and the generated tests, or the budget is exhausted.
    ///
    /// Returns whether a validated brute solution exists.
    async fn run_brute_stage(
        &self,
        statement: &str,
        sample: &SampleIo,
        report: &mut SolveReport,
    ) -> Result<bool, SolveError> {
        info!(
            max_attempts = self.config.execution.max_brute_attempts,
            "Generating brute-force solution"
        );

        let mut brute_loop = GeneratorLoop::new(
            self.brute_agent.clone(),
            self.executor.clone(),
            self.config.execution.brute_temperatures.clone(),
            self.config.execution.max_brute_attempts,
        );

        let mut tests_generated = false;
        let mut validated = false;

        while !validated {
            let outcome = brute_loop
                .run(
                    statement,
                    &self.workspace.sample_input(),
                    &sample.output,
                    |n| self.workspace.brute_attempt(n),
                    |_| self.workspace.sample_run_output(),
                )
                .await?;

            let accepted = match outcome {
                LoopOutcome::Exhausted => break,
                LoopOutcome::Solved { attempt_number } => attempt_number,
            };
            report.sample_validation_passed = true;

            let code = brute_loop
                .accepted_attempts()
                .last()
                .and_then(|a| a.code.clone())
                .unwrap_or_default();
            self.workspace
                .write(self.workspace.brute_solution(), &code)?;

            if !tests_generated {
                let suite = self.design_tests(statement).await?;
                report.test_input = format!("{}\n", suite.content);
                self.workspace
                    .write(self.workspace.test_inputs(), &report.test_input)?;
                tests_generated = true;
                info!(cases = suite.case_count, "Edge-case tests generated");
            }

            info!(attempt = accepted, "Running brute force on generated tests");
            let run = self
                .executor
                .execute(
                    &self.workspace.brute_solution(),
                    &self.workspace.test_inputs(),
                    &self.workspace.brute_outputs(),
                )
                .await
                .map_err(exec_error)?;

            if run.is_success() {
                report.brute_force_code = code;
                report.test_output = std::fs::read_to_string(self.workspace.brute_outputs())?;
                validated = true;
            } else {
                let summary = run
                    .failure_summary()
                    .unwrap_or_else(|| "execution failed".to_string());
                warn!(attempt = accepted, "Brute force failed on generated tests");
                if brute_loop.remaining_budget() == 0 {
                    break;
                }
                brute_loop.push_feedback(format!(
                    "Your solution passed the official sample but failed on generated edge-case tests.\n\
                     Carefully handle array bounds, 1-indexed inputs, and ensure lists are sized correctly.\n\
                     Error details:\n{}",
                    summary
                ));
            }
        }

        report.brute_force_attempts = brute_loop.attempts().to_vec();
        Ok(validated)
    }

    /// Designs the edge-case test stream; format violations are fatal.
    async fn design_tests(
        &self,
        statement: &str,
    ) -> Result<crate::agents::TestSuite, SolveError> {
        info!("Generating edge-case test inputs");
        self.tester_agent.design(statement).await.map_err(|e| match e {
            AgentError::ResponseParse(msg) => SolveError::TestFormat(msg),
            other => SolveError::TestGeneration(other.to_string()),
        })
    }

    /// Runs the optimal loop against the brute-force reference outputs.
    async fn run_optimal_stage(
        &self,
        statement: &str,
        report: &mut SolveReport,
    ) -> Result<(), SolveError> {
        info!(
            max_attempts = self.config.execution.max_optimal_attempts,
            "Generating optimal solution"
        );

        let mut optimal_loop = GeneratorLoop::new(
            self.optimal_agent.clone(),
            self.executor.clone(),
            self.config.execution.optimal_temperatures.clone(),
            self.config.execution.max_optimal_attempts,
        )
        .with_collect_all_matches(self.config.execution.collect_all_matches);

        optimal_loop
            .run(
                statement,
                &self.workspace.test_inputs(),
                &report.test_output,
                |n| self.workspace.optimal_attempt(n),
                |n| self.workspace.optimal_attempt_output(n),
            )
            .await?;

        for (idx, attempt) in optimal_loop.accepted_attempts().iter().enumerate() {
            let rank = (idx + 1) as u32;
            if let Some(code) = &attempt.code {
                self.workspace
                    .write(self.workspace.optimal_success(rank), code)?;
            }
            std::fs::copy(
                self.workspace.optimal_attempt_output(attempt.attempt_number),
                self.workspace.optimal_success_output(rank),
            )?;
        }

        if let Some(winner) = optimal_loop.accepted_attempts().first() {
            if let Some(code) = &winner.code {
                self.workspace
                    .write(self.workspace.optimal_solution(), code)?;
            }
            std::fs::copy(
                self.workspace.optimal_attempt_output(winner.attempt_number),
                self.workspace.optimal_outputs(),
            )?;
            report.success = true;
            info!(attempt = winner.attempt_number, "Optimal solution found");
        }

        report.optimal_attempts = optimal_loop.attempts().to_vec();
        Ok(())
    }

    /// Judges the optimal candidates in groups and writes the comparison
    /// bundle. A judge that answers garbage falls back to the group's own
    /// results; only workspace IO is fatal here.
    async fn run_final_judge(
        &self,
        statement: &str,
        report: &mut SolveReport,
    ) -> Result<(), SolveError> {
        let Some(judge) = &self.judge_agent else {
            return Ok(());
        };

        let candidates: Vec<Attempt> = report
            .optimal_attempts
            .iter()
            .filter(|a| a.code.is_some())
            .cloned()
            .collect();
        if candidates.len() < 2 {
            return Ok(());
        }

        info!(
            candidates = candidates.len(),
            group_size = self.config.final_judge.group_size,
            "Running final judge"
        );

        let mut summary = FinalJudgeSummary::default();
        let mut winners: Vec<Attempt> = Vec::new();

        for (idx, group) in candidates
            .chunks(self.config.final_judge.group_size.max(1))
            .enumerate()
        {
            let (winner_attempt, reason) = match judge.judge(statement, group).await {
                Ok(verdict) => (Some(verdict.winner_attempt), verdict.reason),
                Err(e) => {
                    warn!(group = idx + 1, error = %e, "Judge verdict unusable, falling back");
                    (None, None)
                }
            };

            let winner = winner_attempt
                .and_then(|n| group.iter().find(|a| a.attempt_number == n))
                .or_else(|| group.iter().find(|a| a.output_match))
                .unwrap_or(&group[0]);

            summary.group_results.push(GroupResult {
                group: idx + 1,
                candidates: group.iter().map(|a| a.attempt_number).collect(),
                winner_attempt: winner.attempt_number,
                reason,
            });
            winners.push(winner.clone());
        }

        let top_winners: Vec<Attempt> = winners.into_iter().take(4).collect();
        if !top_winners.is_empty() {
            let comparator = self.workspace.final_comparator();
            self.workspace
                .write(comparator.clone(), &comparator_bundle(statement, &top_winners))?;

            summary.top_winner_attempts =
                top_winners.iter().map(|a| a.attempt_number).collect();
            summary.fallback_code = top_winners[0].code.clone();
            summary.comparator_file = Some(comparator);
        }

        report.final_judge = Some(summary);
        Ok(())
    }
}

/// Renders the human-readable comparison bundle.
fn comparator_bundle(statement: &str, winners: &[Attempt]) -> String {
    let mut bundle = format!("Problem Statement:\n{}\n\n", statement.trim());
    for (idx, winner) in winners.iter().enumerate() {
        bundle.push_str(&format!(
            "Winner {} (Attempt {}):\n\
             Verdict: {}\n\
             Output match: {}\n\
             Execution success: {}\n\
             Notes: {}\n\
             Code:\n{}\n\n",
            idx + 1,
            winner.attempt_number,
            winner.verdict,
            winner.output_match,
            winner.execution_success,
            winner.error_message.as_deref().unwrap_or("N/A"),
            winner.code.as_deref().unwrap_or("").trim()
        ));
    }
    bundle
}

fn exec_error(e: ExecutorError) -> SolveError {
    match e {
        ExecutorError::Io(io) => SolveError::Io(io),
    }
}
