//! LLM agents for the solve pipeline: sample extraction, solution
//! generation, test design, and final judging.

pub mod brute_solver;
pub mod error;
pub mod judge;
pub mod optimal_solver;
pub mod sample_extractor;
pub mod test_designer;

use async_trait::async_trait;

pub use brute_solver::BruteSolverAgent;
pub use error::{AgentError, AgentResult};
pub use judge::{FinalJudgeAgent, JudgeVerdict};
pub use optimal_solver::OptimalSolverAgent;
pub use sample_extractor::{SampleExtractorAgent, SampleKind};
pub use test_designer::{TestDesignerAgent, TestSuite};

/// A stage that produces candidate solution source texts.
///
/// Implemented by the brute and optimal solver agents; the generator loop
/// drives either through this seam.
#[async_trait]
pub trait SolutionGenerator: Send + Sync {
    /// Short stage label used in logs and artifact names.
    fn stage_name(&self) -> &'static str;

    /// Generates one candidate solution.
    ///
    /// `feedback` carries the failure description from the previous attempt
    /// (diff, runtime error, or timeout text); `attempt` is the 1-indexed
    /// attempt number.
    async fn generate(
        &self,
        statement: &str,
        temperature: f64,
        feedback: Option<&str>,
        attempt: u32,
    ) -> AgentResult<String>;
}

/// Builds the shared user message for the solver stages.
pub(crate) fn solution_user_message(
    task_line: &str,
    statement: &str,
    feedback: Option<&str>,
    attempt: u32,
) -> String {
    let mut message = format!(
        "REMINDER: Respond with ONLY raw code. No explanations, no markdown.\n\n{}\n\n{}",
        task_line, statement
    );

    if let Some(feedback) = feedback {
        message.push_str(&format!(
            "\n\n=== FEEDBACK FROM ATTEMPT {} ===\n{}\n\nPlease fix the issues and generate a corrected solution.",
            attempt.saturating_sub(1),
            feedback
        ));
    }

    message
}
