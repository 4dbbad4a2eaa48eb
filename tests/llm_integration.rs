//! Integration tests for the LLM client.
//!
//! These tests make real API calls to OpenAI.
//! Run with: OPENAI_API_KEY=your_key cargo test --test llm_integration -- --ignored

use cp_forge::llm::{ChatClient, GenerationRequest, LlmProvider, Message, ProviderKind};

fn get_test_api_key() -> String {
    std::env::var("OPENAI_API_KEY")
        .expect("OPENAI_API_KEY environment variable must be set for integration tests")
}

fn create_test_client() -> ChatClient {
    ChatClient::new(
        ProviderKind::OpenAi.api_base(),
        get_test_api_key(),
        "gpt-4o-mini",
    )
}

#[tokio::test]
#[ignore] // Run with: cargo test --test llm_integration -- --ignored
async fn test_simple_generation() {
    let client = create_test_client();

    let request = GenerationRequest::new(
        "",
        vec![
            Message::system("You are a helpful assistant. Reply concisely."),
            Message::user("What is 2 + 2? Reply with just the number."),
        ],
    )
    .with_max_tokens(10)
    .with_temperature(0.0);

    let response = client.generate(request).await;
    assert!(response.is_ok(), "Generation failed: {:?}", response.err());

    let response = response.expect("Should have response");
    assert!(
        !response.choices.is_empty(),
        "Should have at least one choice"
    );

    let content = response.first_content().expect("Should have content");
    assert!(
        content.contains('4'),
        "Response should contain '4', got: {}",
        content
    );

    assert!(response.usage.total_tokens > 0, "Should have token usage");
}

#[tokio::test]
#[ignore]
async fn test_multi_turn_conversation() {
    let client = create_test_client();

    let request = GenerationRequest::new(
        "",
        vec![
            Message::system("You are a math tutor. Be concise."),
            Message::user("Remember the number 42."),
            Message::assistant("I'll remember 42."),
            Message::user("What number did I ask you to remember?"),
        ],
    )
    .with_max_tokens(20)
    .with_temperature(0.0);

    let response = client
        .generate(request)
        .await
        .expect("Generation should succeed");
    let content = response.first_content().expect("Should have content");

    assert!(
        content.contains("42"),
        "Response should mention 42, got: {}",
        content
    );
}
