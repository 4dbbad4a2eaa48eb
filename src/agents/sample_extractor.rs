//! Sample Extractor Agent.
//!
//! Locates the official sample input/output blocks inside a problem
//! statement. The model answers with the raw block text, or the single word
//! `NONE` when the statement lacks the requested block; a missing block is
//! fatal for the run.

use std::sync::Arc;

use super::error::{AgentError, AgentResult};
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::utils::strip_code_fences;

/// System prompt for sample extraction.
const SAMPLE_EXTRACTION_SYSTEM_PROMPT: &str = r#"You extract the official SAMPLE INPUT or SAMPLE OUTPUT for a competitive programming problem.

Rules:
- Output ONLY the raw text of the requested sample block, with no commentary, labels, or markdown.
- Preserve the exact whitespace and line structure from the statement.
- Do NOT invent or alter numbers.
- If multiple sample blocks exist, return the FIRST one shown.
- If the problem statement lacks the requested block, respond with the single word: NONE."#;

/// Which sample block to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// The sample input block.
    Input,
    /// The sample output block.
    Output,
}

impl std::fmt::Display for SampleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleKind::Input => write!(f, "INPUT"),
            SampleKind::Output => write!(f, "OUTPUT"),
        }
    }
}

/// Agent that extracts official sample blocks from the statement.
pub struct SampleExtractorAgent {
    llm_client: Arc<dyn LlmProvider>,
}

impl SampleExtractorAgent {
    /// Creates a new sample extractor.
    pub fn new(llm_client: Arc<dyn LlmProvider>) -> Self {
        Self { llm_client }
    }

    /// Extracts the requested sample block.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingSample`] when the model reports the
    /// block is absent, and [`AgentError::EmptyResponse`] when the model
    /// returns nothing usable.
    pub async fn extract(&self, statement: &str, kind: SampleKind) -> AgentResult<String> {
        let user_prompt = format!(
            "Problem statement:\n\n{}\n\nReturn ONLY the official SAMPLE {} block.",
            statement, kind
        );

        let request = GenerationRequest::new(
            "",
            vec![
                Message::system(SAMPLE_EXTRACTION_SYSTEM_PROMPT),
                Message::user(user_prompt),
            ],
        )
        .with_temperature(0.0);

        let response = self.llm_client.generate(request).await?;
        let content = response
            .first_content()
            .map(str::trim)
            .ok_or(AgentError::EmptyResponse)?;

        if content.eq_ignore_ascii_case("NONE") {
            return Err(AgentError::MissingSample {
                kind: kind.to_string(),
            });
        }

        let block = strip_code_fences(content);
        if block.is_empty() {
            return Err(AgentError::MissingSample {
                kind: kind.to_string(),
            });
        }

        Ok(block)
    }
}
