//! Test Designer Agent.
//!
//! Produces the test-input stream fed to both solutions: a leading case
//! count, the official sample as the first case, then several small
//! synthetic cases, with no blank lines anywhere. Downstream parsing relies
//! on this exact shape, so a malformed stream is rejected rather than
//! auto-corrected.

use std::sync::Arc;

use super::error::{AgentError, AgentResult};
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::utils::strip_code_fences;

/// System prompt for test-case design.
const TEST_DESIGN_SYSTEM_PROMPT: &str = r#"You are a test case generation expert for programming problems.

TASK:
- Produce valid input for the given problem exactly as a competitive programming judge would read it.
- If the problem statement contains an official sample input, copy it verbatim at the beginning of your output.
- After the sample, add several additional SMALL custom test cases that explore edge scenarios.

FORMAT RULES:
- If the first line is the number of test cases T, ensure that line reflects the total number of cases (sample + custom).
- Never insert blank lines between test cases or inside any test case.
- Output plain numbers only; no explanations, no bullet points, no Markdown.
- Use small integers and short arrays.

COVERAGE:
- Include boundary cases: minimal sizes, all-equal values, strictly increasing and strictly decreasing patterns.

CRITICAL: Output ONLY the final input stream, with the correct T and test cases in order."#;

/// A validated test-input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuite {
    /// Declared number of cases (the leading line).
    pub case_count: usize,
    /// The full normalized input stream, blank lines removed.
    pub content: String,
}

impl TestSuite {
    /// Validates a normalized input stream against the strict shape.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ResponseParse`] when the stream is empty or
    /// the leading line is not a positive case count.
    pub fn parse(content: &str) -> AgentResult<Self> {
        let content = normalize(content);
        if content.is_empty() {
            return Err(AgentError::ResponseParse(
                "test stream is empty".to_string(),
            ));
        }

        let first_line = content.lines().next().unwrap_or_default().trim();
        let case_count: usize = first_line.parse().map_err(|_| {
            AgentError::ResponseParse(format!(
                "leading line '{}' is not a test-case count",
                first_line
            ))
        })?;

        if case_count == 0 {
            return Err(AgentError::ResponseParse(
                "test-case count must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            case_count,
            content,
        })
    }
}

/// Removes empty lines so generated parsers are never confused.
fn normalize(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Agent that designs the edge-case test-input stream.
pub struct TestDesignerAgent {
    llm_client: Arc<dyn LlmProvider>,
}

impl TestDesignerAgent {
    /// Creates a new test designer.
    pub fn new(llm_client: Arc<dyn LlmProvider>) -> Self {
        Self { llm_client }
    }

    /// Designs the test-input stream for the statement.
    pub async fn design(&self, statement: &str) -> AgentResult<TestSuite> {
        let user_prompt = format!(
            "Generate the complete input stream adhering to the rules above.\n\
             Steps:\n\
             1. Detect whether the problem statement provides a sample input; if so, copy it exactly first.\n\
             2. Append additional custom test cases covering the mandated edge scenarios.\n\
             3. Ensure the very first line (T) equals the total number of test cases you output.\n\
             4. Use small values and short arrays while respecting all constraints.\n\
             5. Output plain text only, no commentary or blank lines anywhere.\n\n\
             Problem statement:\n\n{}",
            statement
        );

        let request = GenerationRequest::new(
            "",
            vec![
                Message::system(TEST_DESIGN_SYSTEM_PROMPT),
                Message::user(user_prompt),
            ],
        )
        .with_temperature(0.7);

        let response = self.llm_client.generate(request).await?;
        let content = response.first_content().ok_or(AgentError::EmptyResponse)?;

        TestSuite::parse(&strip_code_fences(content))
    }
}
