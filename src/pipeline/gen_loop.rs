//! Bounded generate-execute-compare retry loop.
//!
//! The same loop drives both solver stages: request a candidate from the
//! generator, run it against a fixed input, compare stdout to the expected
//! text, and feed failures back into the next generation request. The loop
//! is re-entrant: the orchestrator can push external feedback and call
//! [`GeneratorLoop::run`] again, and attempt numbering continues where it
//! left off against the same overall budget.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::agents::SolutionGenerator;
use crate::pipeline::types::{Attempt, Verdict};
use crate::runner::{CodeExecutor, ExecutionOutcome, OutputComparator};

/// Maximum feedback length carried into the next generation request.
const MAX_FEEDBACK_LEN: usize = 4000;

/// Terminal state of one [`GeneratorLoop::run`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// An attempt produced matching output.
    Solved {
        /// Number of the first accepted attempt.
        attempt_number: u32,
    },
    /// The budget ran out with no match.
    Exhausted,
}

/// Drives a [`SolutionGenerator`] through bounded validation attempts.
pub struct GeneratorLoop {
    agent: Arc<dyn SolutionGenerator>,
    executor: CodeExecutor,
    comparator: OutputComparator,
    temperatures: Vec<f64>,
    max_attempts: u32,
    collect_all_matches: bool,
    attempts: Vec<Attempt>,
    next_attempt: u32,
    feedback: Option<String>,
}

impl GeneratorLoop {
    /// Creates a fresh loop with the full attempt budget.
    pub fn new(
        agent: Arc<dyn SolutionGenerator>,
        executor: CodeExecutor,
        temperatures: Vec<f64>,
        max_attempts: u32,
    ) -> Self {
        Self {
            agent,
            executor,
            comparator: OutputComparator::new(),
            temperatures,
            max_attempts,
            collect_all_matches: false,
            attempts: Vec::new(),
            next_attempt: 1,
            feedback: None,
        }
    }

    /// Keep searching after the first match, recording every accepted
    /// attempt until the budget is exhausted.
    pub fn with_collect_all_matches(mut self, collect: bool) -> Self {
        self.collect_all_matches = collect;
        self
    }

    /// Full attempt history so far, in order.
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// Accepted attempts so far, in order.
    pub fn accepted_attempts(&self) -> Vec<&Attempt> {
        self.attempts.iter().filter(|a| a.is_accepted()).collect()
    }

    /// Attempts left in the budget.
    pub fn remaining_budget(&self) -> u32 {
        self.max_attempts.saturating_sub(self.next_attempt - 1)
    }

    /// Injects external feedback ahead of the next generation request.
    ///
    /// Used when a candidate that passed this loop's check fails a later
    /// stage and the loop is re-entered.
    pub fn push_feedback(&mut self, feedback: impl Into<String>) {
        self.feedback = Some(truncate(feedback.into()));
    }

    /// Runs attempts until output matches `expected` or the budget is gone.
    ///
    /// Each attempt's source lands at `source_path(n)` and its stdout at
    /// `output_path(n)`. Candidate failures consume an attempt and become
    /// feedback; `Err` is reserved for workspace IO failures.
    pub async fn run(
        &mut self,
        statement: &str,
        input: &Path,
        expected: &str,
        source_path: impl Fn(u32) -> PathBuf,
        output_path: impl Fn(u32) -> PathBuf,
    ) -> std::io::Result<LoopOutcome> {
        let mut first_match: Option<u32> = None;

        while self.next_attempt <= self.max_attempts {
            let n = self.next_attempt;
            self.next_attempt += 1;

            let temperature =
                self.temperatures[((n - 1) as usize) % self.temperatures.len()];

            info!(
                stage = self.agent.stage_name(),
                attempt = n,
                max_attempts = self.max_attempts,
                temperature,
                "Generating candidate"
            );

            let code = match self
                .agent
                .generate(statement, temperature, self.feedback.as_deref(), n)
                .await
            {
                Ok(code) => code,
                Err(e) => {
                    warn!(stage = self.agent.stage_name(), attempt = n, error = %e, "Generation failed");
                    self.attempts.push(
                        Attempt::rejected(n, temperature, Verdict::GenerationFailed)
                            .with_error(e.to_string()),
                    );
                    continue;
                }
            };

            let source = source_path(n);
            let output = output_path(n);
            std::fs::write(&source, &code)?;

            let outcome = match self.executor.execute(&source, input, &output).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let summary = format!("failed to execute candidate: {}", e);
                    warn!(stage = self.agent.stage_name(), attempt = n, error = %e, "Execution failed");
                    self.feedback = Some(truncate(summary.clone()));
                    self.attempts.push(
                        Attempt::rejected(n, temperature, Verdict::RuntimeError)
                            .with_code(code)
                            .with_error(summary),
                    );
                    continue;
                }
            };

            match outcome {
                ExecutionOutcome::Completed => {
                    let actual = std::fs::read_to_string(&output)?;
                    match self.comparator.diff_summary(expected, &actual) {
                        None => {
                            info!(stage = self.agent.stage_name(), attempt = n, "Output matched");
                            self.attempts.push(Attempt::accepted(n, temperature, code));
                            first_match.get_or_insert(n);
                            if !self.collect_all_matches {
                                break;
                            }
                        }
                        Some(diff) => {
                            let feedback = format!(
                                "Your solution produced incorrect output.\n{}\n\
                                 Expected output:\n{}\nActual output:\n{}",
                                diff, expected, actual
                            );
                            self.feedback = Some(truncate(feedback));
                            self.attempts.push(
                                Attempt::rejected(n, temperature, Verdict::WrongAnswer)
                                    .with_code(code)
                                    .with_execution_success(true)
                                    .with_output_diff(diff.clone())
                                    .with_error(format!("wrong answer: {}", diff)),
                            );
                        }
                    }
                }
                ExecutionOutcome::Crashed { .. } | ExecutionOutcome::TimedOut { .. } => {
                    let verdict = match outcome {
                        ExecutionOutcome::TimedOut { .. } => Verdict::Timeout,
                        _ => Verdict::RuntimeError,
                    };
                    let summary = outcome
                        .failure_summary()
                        .unwrap_or_else(|| "execution failed".to_string());
                    self.feedback = Some(truncate(summary.clone()));
                    self.attempts.push(
                        Attempt::rejected(n, temperature, verdict)
                            .with_code(code)
                            .with_error(summary),
                    );
                }
            }
        }

        Ok(match first_match {
            Some(attempt_number) => LoopOutcome::Solved { attempt_number },
            None => LoopOutcome::Exhausted,
        })
    }
}

fn truncate(s: String) -> String {
    if s.len() <= MAX_FEEDBACK_LEN {
        s
    } else {
        let mut end = MAX_FEEDBACK_LEN;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated]", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentResult;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Replays a scripted sequence of candidates and records the feedback
    /// it was shown.
    struct ScriptedGenerator {
        scripts: Mutex<VecDeque<AgentResult<String>>>,
        seen_feedback: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedGenerator {
        fn new(scripts: Vec<AgentResult<String>>) -> Self {
            Self {
                scripts: Mutex::new(scripts.into()),
                seen_feedback: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SolutionGenerator for ScriptedGenerator {
        fn stage_name(&self) -> &'static str {
            "test"
        }

        async fn generate(
            &self,
            _statement: &str,
            _temperature: f64,
            feedback: Option<&str>,
            _attempt: u32,
        ) -> AgentResult<String> {
            self.seen_feedback
                .lock()
                .unwrap()
                .push(feedback.map(str::to_string));
            self.scripts
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted generator ran out of candidates")
        }
    }

    struct Harness {
        dir: TempDir,
        input: PathBuf,
    }

    impl Harness {
        fn new(input_content: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let input = dir.path().join("input.txt");
            std::fs::write(&input, input_content).unwrap();
            Self { dir, input }
        }

        fn source_path(&self) -> impl Fn(u32) -> PathBuf + '_ {
            move |n| self.dir.path().join(format!("attempt_{}.sh", n))
        }

        fn output_path(&self) -> impl Fn(u32) -> PathBuf + '_ {
            move |n| self.dir.path().join(format!("attempt_{}_output.txt", n))
        }
    }

    fn gen_loop(agent: ScriptedGenerator, max_attempts: u32) -> GeneratorLoop {
        GeneratorLoop::new(
            Arc::new(agent),
            CodeExecutor::new("/bin/sh", Duration::from_secs(5)),
            vec![0.3, 0.2, 0.1],
            max_attempts,
        )
    }

    #[tokio::test]
    async fn test_stops_at_first_match() {
        let harness = Harness::new("4\n");
        let mut lp = gen_loop(ScriptedGenerator::new(vec![Ok("cat\n".to_string())]), 3);

        let outcome = lp
            .run(
                "statement",
                &harness.input,
                "4",
                harness.source_path(),
                harness.output_path(),
            )
            .await
            .unwrap();

        assert_eq!(outcome, LoopOutcome::Solved { attempt_number: 1 });
        assert_eq!(lp.attempts().len(), 1);
        assert!(lp.attempts()[0].is_accepted());
        assert_eq!(lp.remaining_budget(), 2);
    }

    #[tokio::test]
    async fn test_wrong_answer_feeds_diff_into_next_attempt() {
        let harness = Harness::new("4\n");
        let agent = ScriptedGenerator::new(vec![
            Ok("echo 5\n".to_string()),
            Ok("cat\n".to_string()),
        ]);
        let mut lp = gen_loop(agent, 3);

        let outcome = lp
            .run(
                "statement",
                &harness.input,
                "4\n",
                harness.source_path(),
                harness.output_path(),
            )
            .await
            .unwrap();

        assert_eq!(outcome, LoopOutcome::Solved { attempt_number: 2 });
        assert_eq!(lp.attempts().len(), 2);
        assert_eq!(lp.attempts()[0].verdict, Verdict::WrongAnswer);
        assert!(lp.attempts()[0].execution_success);
        assert!(lp.attempts()[0].output_diff.is_some());
    }

    #[tokio::test]
    async fn test_feedback_contains_diff_and_outputs() {
        let harness = Harness::new("4\n");
        let agent = Arc::new(ScriptedGenerator::new(vec![
            Ok("echo 5\n".to_string()),
            Ok("cat\n".to_string()),
        ]));
        let mut lp = GeneratorLoop::new(
            agent.clone(),
            CodeExecutor::new("/bin/sh", Duration::from_secs(5)),
            vec![0.3],
            3,
        );

        lp.run(
            "statement",
            &harness.input,
            "4\n",
            harness.source_path(),
            harness.output_path(),
        )
        .await
        .unwrap();

        let seen = agent.seen_feedback.lock().unwrap();
        assert_eq!(seen[0], None);
        let second = seen[1].as_deref().unwrap();
        assert!(second.contains("incorrect output"));
        assert!(second.contains("first mismatch"));
    }

    #[tokio::test]
    async fn test_timeouts_exhaust_budget() {
        let harness = Harness::new("");
        let agent = ScriptedGenerator::new(vec![
            Ok("sleep 30\n".to_string()),
            Ok("sleep 30\n".to_string()),
        ]);
        let mut lp = GeneratorLoop::new(
            Arc::new(agent),
            CodeExecutor::new("/bin/sh", Duration::from_millis(200)),
            vec![0.3],
            2,
        );

        let outcome = lp
            .run(
                "statement",
                &harness.input,
                "4",
                harness.source_path(),
                harness.output_path(),
            )
            .await
            .unwrap();

        assert_eq!(outcome, LoopOutcome::Exhausted);
        assert_eq!(lp.attempts().len(), 2);
        assert!(lp
            .attempts()
            .iter()
            .all(|a| a.verdict == Verdict::Timeout));
        assert_eq!(lp.remaining_budget(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_consumes_attempt() {
        use crate::agents::AgentError;

        let harness = Harness::new("4\n");
        let agent = ScriptedGenerator::new(vec![
            Err(AgentError::NotCode),
            Ok("cat\n".to_string()),
        ]);
        let mut lp = gen_loop(agent, 2);

        let outcome = lp
            .run(
                "statement",
                &harness.input,
                "4",
                harness.source_path(),
                harness.output_path(),
            )
            .await
            .unwrap();

        assert_eq!(outcome, LoopOutcome::Solved { attempt_number: 2 });
        assert_eq!(lp.attempts()[0].verdict, Verdict::GenerationFailed);
        assert!(lp.attempts()[0].code.is_none());
    }

    #[tokio::test]
    async fn test_reentry_continues_numbering_and_budget() {
        let harness = Harness::new("4\n");
        let agent = Arc::new(ScriptedGenerator::new(vec![
            Ok("cat\n".to_string()),
            Ok("cat\n".to_string()),
        ]));
        let mut lp = GeneratorLoop::new(
            agent.clone(),
            CodeExecutor::new("/bin/sh", Duration::from_secs(5)),
            vec![0.3],
            3,
        );

        let first = lp
            .run(
                "statement",
                &harness.input,
                "4",
                harness.source_path(),
                harness.output_path(),
            )
            .await
            .unwrap();
        assert_eq!(first, LoopOutcome::Solved { attempt_number: 1 });

        lp.push_feedback("passed the sample but failed on generated tests");
        let second = lp
            .run(
                "statement",
                &harness.input,
                "4",
                harness.source_path(),
                harness.output_path(),
            )
            .await
            .unwrap();

        assert_eq!(second, LoopOutcome::Solved { attempt_number: 2 });
        let numbers: Vec<u32> = lp.attempts().iter().map(|a| a.attempt_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(lp.remaining_budget(), 1);

        let seen = agent.seen_feedback.lock().unwrap();
        assert!(seen[1].as_deref().unwrap().contains("generated tests"));
    }

    #[tokio::test]
    async fn test_collect_all_matches_records_every_success() {
        let harness = Harness::new("4\n");
        let agent = ScriptedGenerator::new(vec![
            Ok("cat\n".to_string()),
            Ok("echo 5\n".to_string()),
            Ok("cat\n".to_string()),
        ]);
        let mut lp = gen_loop(agent, 3).with_collect_all_matches(true);

        let outcome = lp
            .run(
                "statement",
                &harness.input,
                "4",
                harness.source_path(),
                harness.output_path(),
            )
            .await
            .unwrap();

        assert_eq!(outcome, LoopOutcome::Solved { attempt_number: 1 });
        assert_eq!(lp.attempts().len(), 3);
        assert_eq!(lp.accepted_attempts().len(), 2);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(MAX_FEEDBACK_LEN);
        let truncated = truncate(long);
        assert!(truncated.ends_with("[truncated]"));
    }
}
