//! Core records produced by the solve pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verdict for one generation+execution+comparison cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Output matched the expected text exactly (modulo trailing whitespace).
    Accepted,
    /// Execution completed but the output differed.
    WrongAnswer,
    /// The candidate crashed before completing.
    RuntimeError,
    /// The candidate exceeded the wall-clock limit.
    Timeout,
    /// The LLM call failed or the response was not usable code.
    GenerationFailed,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "accepted"),
            Verdict::WrongAnswer => write!(f, "wrong_answer"),
            Verdict::RuntimeError => write!(f, "runtime_error"),
            Verdict::Timeout => write!(f, "timeout"),
            Verdict::GenerationFailed => write!(f, "generation_failed"),
        }
    }
}

/// One attempt within a bounded retry loop.
///
/// Immutable once pushed into the attempt history; sequence numbers within
/// a loop are strictly increasing 1..k with no gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    /// 1-indexed attempt number within its loop.
    pub attempt_number: u32,
    /// When the attempt was recorded.
    pub timestamp: DateTime<Utc>,
    /// Sampling temperature used for this attempt.
    pub temperature: f64,
    /// Generated source text, absent when generation itself failed.
    pub code: Option<String>,
    /// Outcome of the cycle.
    pub verdict: Verdict,
    /// Failure description (runtime error, timeout, or generation error).
    pub error_message: Option<String>,
    /// Whether the candidate executed to completion.
    pub execution_success: bool,
    /// Whether the output matched the expected text.
    pub output_match: bool,
    /// Diff summary when the output mismatched.
    pub output_diff: Option<String>,
}

impl Attempt {
    /// Creates an accepted attempt.
    pub fn accepted(attempt_number: u32, temperature: f64, code: impl Into<String>) -> Self {
        Self {
            attempt_number,
            timestamp: Utc::now(),
            temperature,
            code: Some(code.into()),
            verdict: Verdict::Accepted,
            error_message: None,
            execution_success: true,
            output_match: true,
            output_diff: None,
        }
    }

    /// Creates a rejected attempt with the given verdict.
    pub fn rejected(attempt_number: u32, temperature: f64, verdict: Verdict) -> Self {
        Self {
            attempt_number,
            timestamp: Utc::now(),
            temperature,
            code: None,
            verdict,
            error_message: None,
            execution_success: false,
            output_match: false,
            output_diff: None,
        }
    }

    /// Attaches the generated source.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attaches a failure description.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error_message = Some(error.into());
        self
    }

    /// Marks the candidate as having executed to completion.
    pub fn with_execution_success(mut self, success: bool) -> Self {
        self.execution_success = success;
        self
    }

    /// Attaches the diff summary for a wrong answer.
    pub fn with_output_diff(mut self, diff: impl Into<String>) -> Self {
        self.output_diff = Some(diff.into());
        self
    }

    /// Returns true when this attempt was accepted.
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}

/// The official sample input/output pair, extracted once and read-only
/// afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleIo {
    /// Sample input block.
    pub input: String,
    /// Sample output block.
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_attempt() {
        let attempt = Attempt::accepted(1, 0.3, "print(4)");
        assert!(attempt.is_accepted());
        assert!(attempt.execution_success);
        assert!(attempt.output_match);
        assert_eq!(attempt.code.as_deref(), Some("print(4)"));
    }

    #[test]
    fn test_rejected_attempt_builder() {
        let attempt = Attempt::rejected(2, 0.27, Verdict::WrongAnswer)
            .with_code("print(5)")
            .with_execution_success(true)
            .with_output_diff("first mismatch at line 1");

        assert!(!attempt.is_accepted());
        assert!(attempt.execution_success);
        assert!(!attempt.output_match);
        assert_eq!(attempt.verdict, Verdict::WrongAnswer);
        assert!(attempt.output_diff.is_some());
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Accepted.to_string(), "accepted");
        assert_eq!(Verdict::GenerationFailed.to_string(), "generation_failed");
    }

    #[test]
    fn test_attempt_serializes_verdict_snake_case() {
        let attempt = Attempt::rejected(1, 0.2, Verdict::RuntimeError);
        let json = serde_json::to_string(&attempt).unwrap();
        assert!(json.contains("\"runtime_error\""));
    }
}
