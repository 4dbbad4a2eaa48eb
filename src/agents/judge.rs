//! Final Judge Agent.
//!
//! Compares several accepted optimal candidates and picks the single most
//! promising one. The verdict must come back as a strict JSON object; a
//! response that cannot be parsed is an error, and the caller falls back to
//! its own selection rule.

use std::sync::Arc;

use serde::Deserialize;

use super::error::{AgentError, AgentResult};
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::pipeline::types::Attempt;
use crate::utils::extract_json_object;

/// System prompt for candidate comparison.
const JUDGE_SYSTEM_PROMPT: &str = r#"You are a meticulous code judge.

Given a competitive programming problem and several candidate Python solutions (with metadata about prior automated tests),
carefully analyze each candidate's correctness, efficiency, and robustness. Favor implementations that already passed automated
tests (verdict=Accepted, output_match=True). If none passed, choose the one most likely to be correct and scalable.

Return your decision STRICTLY as a JSON object:
{
  "winner_attempt": <attempt_number>,
  "reason": "<short explanation>"
}

Do not include any other text."#;

/// The judge's decision.
#[derive(Debug, Clone, Deserialize)]
pub struct JudgeVerdict {
    /// Attempt number of the winning candidate.
    pub winner_attempt: u32,
    /// Short explanation, when the model supplied one.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Agent that selects the best candidate among accepted solutions.
pub struct FinalJudgeAgent {
    llm_client: Arc<dyn LlmProvider>,
}

impl FinalJudgeAgent {
    /// Creates a new final judge.
    pub fn new(llm_client: Arc<dyn LlmProvider>) -> Self {
        Self { llm_client }
    }

    /// Judges the candidates and returns the winner.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ResponseParse`] when the candidate list is
    /// empty or the model's answer is not the required JSON object.
    pub async fn judge(
        &self,
        statement: &str,
        candidates: &[Attempt],
    ) -> AgentResult<JudgeVerdict> {
        if candidates.is_empty() {
            return Err(AgentError::ResponseParse(
                "no candidates to judge".to_string(),
            ));
        }

        let user_prompt = format!(
            "Problem Statement:\n{}\n\nCandidates:\n{}\n\n\
             Select the single best candidate and respond with the JSON format described earlier.",
            statement,
            render_candidates(candidates)
        );

        let request = GenerationRequest::new(
            "",
            vec![
                Message::system(JUDGE_SYSTEM_PROMPT),
                Message::user(user_prompt),
            ],
        )
        .with_temperature(0.2);

        let response = self.llm_client.generate(request).await?;
        let content = response.first_content().ok_or(AgentError::EmptyResponse)?;

        let json = extract_json_object(content).ok_or_else(|| {
            AgentError::ResponseParse("judge response contains no JSON object".to_string())
        })?;

        let verdict: JudgeVerdict = serde_json::from_str(&json)
            .map_err(|e| AgentError::ResponseParse(format!("invalid judge verdict: {}", e)))?;

        Ok(verdict)
    }
}

/// Formats the candidate metadata blocks shown to the judge.
fn render_candidates(candidates: &[Attempt]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            format!(
                "Candidate {} (attempt {}):\n  \
                 Verdict: {}\n  \
                 Output match: {}\n  \
                 Execution success: {}\n  \
                 Notes: {}\n  \
                 Code:\n{}\n  --- END CODE ---",
                idx + 1,
                candidate.attempt_number,
                candidate.verdict,
                candidate.output_match,
                candidate.execution_success,
                candidate.error_message.as_deref().unwrap_or("N/A"),
                candidate.code.as_deref().unwrap_or("").trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::{Choice, GenerationResponse, Usage};
    use async_trait::async_trait;

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

    fn candidates() -> Vec<Attempt> {
        vec![
            Attempt::accepted(2, 0.3, "print(1)"),
            Attempt::accepted(4, 0.15, "print(1)\n"),
        ]
    }

    #[tokio::test]
    async fn test_judge_parses_plain_json() {
        let agent = FinalJudgeAgent::new(Arc::new(MockLlmProvider {
            response: r#"{"winner_attempt": 4, "reason": "cleaner parsing"}"#.to_string(),
        }));

        let verdict = agent.judge("statement", &candidates()).await.unwrap();
        assert_eq!(verdict.winner_attempt, 4);
        assert_eq!(verdict.reason.as_deref(), Some("cleaner parsing"));
    }

    #[tokio::test]
    async fn test_judge_parses_fenced_json() {
        let agent = FinalJudgeAgent::new(Arc::new(MockLlmProvider {
            response: "```json\n{\"winner_attempt\": 2}\n```".to_string(),
        }));

        let verdict = agent.judge("statement", &candidates()).await.unwrap();
        assert_eq!(verdict.winner_attempt, 2);
        assert!(verdict.reason.is_none());
    }

    #[tokio::test]
    async fn test_judge_rejects_prose() {
        let agent = FinalJudgeAgent::new(Arc::new(MockLlmProvider {
            response: "Candidate 1 looks best to me.".to_string(),
        }));

        let err = agent.judge("statement", &candidates()).await.unwrap_err();
        assert!(matches!(err, AgentError::ResponseParse(_)));
    }

    #[tokio::test]
    async fn test_judge_rejects_empty_candidate_list() {
        let agent = FinalJudgeAgent::new(Arc::new(MockLlmProvider {
            response: r#"{"winner_attempt": 1}"#.to_string(),
        }));

        let err = agent.judge("statement", &[]).await.unwrap_err();
        assert!(matches!(err, AgentError::ResponseParse(_)));
    }

    #[test]
    fn test_render_candidates_includes_metadata() {
        let rendered = render_candidates(&candidates());
        assert!(rendered.contains("Candidate 1 (attempt 2)"));
        assert!(rendered.contains("Verdict: accepted"));
        assert!(rendered.contains("--- END CODE ---"));
    }
}
