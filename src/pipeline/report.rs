//! Machine-readable run report.
//!
//! Serialized as `results.json` in the workspace for consumption by an
//! external viewer; the key set is part of that contract.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::SolveError;
use crate::pipeline::types::Attempt;

/// One judged group of optimal candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResult {
    /// 1-indexed group number.
    pub group: usize,
    /// Attempt numbers of the group's candidates.
    pub candidates: Vec<u32>,
    /// Attempt number the judge selected.
    pub winner_attempt: u32,
    /// The judge's explanation, when given.
    pub reason: Option<String>,
}

/// Summary of the optional final-judge pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalJudgeSummary {
    /// Per-group verdicts.
    pub group_results: Vec<GroupResult>,
    /// Attempt numbers of the overall top winners, best first.
    pub top_winner_attempts: Vec<u32>,
    /// Path of the human-readable comparison bundle.
    pub comparator_file: Option<PathBuf>,
    /// Source of the top winner, used when the run otherwise has no
    /// accepted solution.
    pub fallback_code: Option<String>,
}

/// Consolidated metadata for one solve run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// The full problem statement.
    pub problem_statement: String,
    /// Generated test-input stream.
    pub test_input: String,
    /// Brute-force outputs over the generated tests (the reference answers).
    pub test_output: String,
    /// The validated brute-force source.
    pub brute_force_code: String,
    /// Brute-loop attempt history.
    pub brute_force_attempts: Vec<Attempt>,
    /// Optimal-loop attempt history.
    pub optimal_attempts: Vec<Attempt>,
    /// Whether an optimal solution was accepted.
    pub success: bool,
    /// Attempts consumed across both loops.
    pub total_attempts: u32,
    /// Official sample input.
    pub sample_input: String,
    /// Official sample output.
    pub sample_output: String,
    /// Whether a brute candidate reproduced the sample output.
    pub sample_validation_passed: bool,
    /// Final-judge summary, absent when judging was disabled or skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_judge: Option<FinalJudgeSummary>,
}

impl SolveReport {
    /// Creates an empty report for the statement; stages fill it in as
    /// they complete.
    pub fn new(problem_statement: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            problem_statement: problem_statement.into(),
            test_input: String::new(),
            test_output: String::new(),
            brute_force_code: String::new(),
            brute_force_attempts: Vec::new(),
            optimal_attempts: Vec::new(),
            success: false,
            total_attempts: 0,
            sample_input: String::new(),
            sample_output: String::new(),
            sample_validation_passed: false,
            final_judge: None,
        }
    }

    /// Recomputes the attempt total from the recorded histories.
    pub fn update_totals(&mut self) {
        self.total_attempts =
            (self.brute_force_attempts.len() + self.optimal_attempts.len()) as u32;
    }

    /// Writes the report as pretty-printed JSON.
    pub fn persist(&self, path: &Path) -> Result<(), SolveError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Results saved");
        Ok(())
    }
}
