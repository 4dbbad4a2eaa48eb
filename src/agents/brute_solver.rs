//! Brute Solver Agent.
//!
//! Generates slow-but-correct reference solutions; correctness is the only
//! goal, efficiency is explicitly not.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::{AgentError, AgentResult};
use super::{solution_user_message, SolutionGenerator};
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::utils::{looks_like_code, strip_code_fences};

/// System prompt for brute-force generation.
const BRUTE_SYSTEM_PROMPT: &str = r#"You are a brute force algorithm expert.

Your task is to generate a SIMPLE, CORRECT brute force solution in Python.

Guidelines:
- Prioritize CORRECTNESS over efficiency
- Use simple, straightforward approaches (nested loops, recursion, etc.)
- Don't worry about time/space complexity
- Read input from stdin, write output to stdout
- Handle the exact input/output format specified
- Include proper input parsing
- No unnecessary comments or explanations in code
- Make sure the solution is complete and runnable
- Carefully handle 1-indexed inputs: allocate arrays with length N+1 or larger and guard every index access

Output ONLY the Python code, no markdown, no explanations.
ABSOLUTELY NO EXPLANATIONS OR MARKDOWN.
OUTPUT RAW PYTHON CODE ONLY."#;

/// Agent that generates brute-force reference solutions.
pub struct BruteSolverAgent {
    llm_client: Arc<dyn LlmProvider>,
}

impl BruteSolverAgent {
    /// Creates a new brute solver.
    pub fn new(llm_client: Arc<dyn LlmProvider>) -> Self {
        Self { llm_client }
    }
}

#[async_trait]
impl SolutionGenerator for BruteSolverAgent {
    fn stage_name(&self) -> &'static str {
        "brute"
    }

    async fn generate(
        &self,
        statement: &str,
        temperature: f64,
        feedback: Option<&str>,
        attempt: u32,
    ) -> AgentResult<String> {
        let user_message = solution_user_message(
            "Generate a brute force solution for this problem:",
            statement,
            feedback,
            attempt,
        );

        let request = GenerationRequest::new(
            "",
            vec![
                Message::system(BRUTE_SYSTEM_PROMPT),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::{Choice, GenerationResponse, Usage};

    struct MockLlmProvider {
        response: String,
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
            Ok(GenerationResponse {
                id: "test-id".to_string(),
                model: "test-model".to_string(),
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(self.response.clone()),
                    finish_reason: "stop".to_string(),
                }],
                usage: Usage {
                    prompt_tokens: 1,
                    completion_tokens: 1,
                    total_tokens: 2,
                },
            })
        }
    }

    #[tokio::test]
    async fn test_generate_strips_fence() {
        let agent = BruteSolverAgent::new(Arc::new(MockLlmProvider {
            response: "```python\nprint(sum(map(int, input().split())))\n```".to_string(),
        }));

        let code = agent.generate("statement", 0.2, None, 1).await.unwrap();
        assert_eq!(code, "print(sum(map(int, input().split())))");
    }

    #[tokio::test]
    async fn test_generate_rejects_prose() {
        let agent = BruteSolverAgent::new(Arc::new(MockLlmProvider {
            response: "Certainly! The approach is to iterate over all pairs.".to_string(),
        }));

        let err = agent.generate("statement", 0.2, None, 1).await.unwrap_err();
        assert!(matches!(err, AgentError::NotCode));
    }

    #[test]
    fn test_feedback_is_threaded_into_user_message() {
        let message =
            solution_user_message("Generate:", "statement", Some("wrong answer on line 1"), 2);
        assert!(message.contains("FEEDBACK FROM ATTEMPT 1"));
        assert!(message.contains("wrong answer on line 1"));
    }
}
