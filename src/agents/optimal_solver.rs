//! Optimal Solver Agent.
//!
//! Generates solutions intended to be both correct and efficient for the
//! stated constraints; validated against the brute-force reference outputs.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::{AgentError, AgentResult};
use super::{solution_user_message, SolutionGenerator};
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::utils::{looks_like_code, strip_code_fences};

/// System prompt for optimal-solution generation.
const OPTIMAL_SYSTEM_PROMPT: &str = r#"You are an expert competitive programmer.

Your task is to generate an EFFICIENT solution in Python that meets the time/space constraints.

Guidelines:
- Optimize for the given constraints in the problem
- Use efficient algorithms and data structures
- Aim for optimal time and space complexity
- Read input from stdin, write output to stdout
- Handle the exact input/output format specified
- Include proper input parsing
- The solution must be CORRECT (passing all test cases)
- No comments or explanations in code
- Make sure the solution is complete and runnable

Output ONLY the Python code, no markdown, no explanations.
ABSOLUTELY NO EXPLANATIONS OR MARKDOWN.
OUTPUT RAW PYTHON CODE ONLY."#;

/// Agent that generates efficient candidate solutions.
pub struct OptimalSolverAgent {
    llm_client: Arc<dyn LlmProvider>,
}

impl OptimalSolverAgent {
    /// Creates a new optimal solver.
    pub fn new(llm_client: Arc<dyn LlmProvider>) -> Self {
        Self { llm_client }
    }
}

#[async_trait]
impl SolutionGenerator for OptimalSolverAgent {
    fn stage_name(&self) -> &'static str {
        "optimal"
    }

    async fn generate(
        &self,
        statement: &str,
        temperature: f64,
        feedback: Option<&str>,
        attempt: u32,
    ) -> AgentResult<String> {
        let user_message = solution_user_message(
            "Generate an optimal solution for this problem:",
            statement,
            feedback,
            attempt,
        );

        let request = GenerationRequest::new(
            "",
            vec![
                Message::system(OPTIMAL_SYSTEM_PROMPT),
                Message::user(user_message),
            ],
        )
        .with_temperature(temperature);

        let response = self.llm_client.generate(request).await?;
        let content = response.first_content().ok_or(AgentError::EmptyResponse)?;

        let code = strip_code_fences(content);
        if !looks_like_code(&code) {
            return Err(AgentError::NotCode);
        }

        Ok(code)
    }
}
