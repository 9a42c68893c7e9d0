//! LLM-backed synthesis through the full runner, using a mock client.

mod common;

use common::mocks::{MockLLMClient, MockSearchProvider};
use scatter::research::{LlmSynthesizer, ResearchCoordinator};
use scatter::types::NodeStatus;
use scatter::workflows::{AgentProfile, SYNTHESIS_NODE};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn document_reply(title: &str) -> String {
    format!(
        "Sure, here is the document:\n```json\n{}\n```",
        json!({
            "title": title,
            "sections": [{"heading": "A", "body": "Two results."}],
            "references": ["https://example.com/A/1"],
            "summary": "A has results."
        })
    )
}

fn coordinator(client: MockLLMClient) -> ResearchCoordinator {
    let provider = MockSearchProvider::new().with_hits("A", 2).into_arc();
    ResearchCoordinator::new(provider, Arc::new(LlmSynthesizer::new(Box::new(client))))
}

#[tokio::test]
async fn test_self_reflecting_agent_reviews_its_draft() {
    let draft = document_reply("Draft");
    let revised = document_reply("Revised");
    let client = MockLLMClient::with_responses(&[&draft, &revised]);

    let results = coordinator(client.clone())
        .research(&["A"], CancellationToken::new())
        .await
        .unwrap();

    let doc = results.document(SYNTHESIS_NODE).unwrap();
    assert_eq!(doc.title, "Revised");

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].0.contains("Research Synthesizer"));
    assert!(prompts[0].1.contains("https://example.com/A/1"));
    assert!(prompts[0].1.contains("\"summary\""));
    assert!(prompts[1].1.contains("Draft"));
}

#[tokio::test]
async fn test_agent_without_reflection_answers_once() {
    let client = MockLLMClient::new(&document_reply("Only"));
    let summary_agent = AgentProfile {
        self_reflect: false,
        ..AgentProfile::research_synthesizer()
    };

    let results = coordinator(client.clone())
        .with_agents(AgentProfile::search_specialist(), summary_agent)
        .research(&["A"], CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(results.document(SYNTHESIS_NODE).unwrap().title, "Only");
    assert_eq!(client.prompts().len(), 1);
}

#[tokio::test]
async fn test_llm_failure_fails_synthesis_only() {
    let results = coordinator(MockLLMClient::failing())
        .research(&["A"], CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(results.get("search_0").unwrap().status, NodeStatus::Completed);

    let synthesis = results.get(SYNTHESIS_NODE).unwrap();
    assert_eq!(synthesis.status, NodeStatus::Failed);
    assert!(synthesis.result.is_none());
    assert!(synthesis.error.as_deref().unwrap().contains("Mock LLM failure"));
}

#[tokio::test]
async fn test_reply_missing_fields_fails_validation() {
    let client = MockLLMClient::new(r#"{"title": "No body"}"#);

    let results = coordinator(client)
        .research(&["A"], CancellationToken::new())
        .await
        .unwrap();

    let synthesis = results.get(SYNTHESIS_NODE).unwrap();
    assert_eq!(synthesis.status, NodeStatus::Failed);
    assert!(synthesis.error.as_deref().unwrap().contains("sections"));
}

#[tokio::test]
async fn test_reply_without_json_fails() {
    let results = coordinator(MockLLMClient::new("I could not find anything."))
        .research(&["A"], CancellationToken::new())
        .await
        .unwrap();

    let synthesis = results.get(SYNTHESIS_NODE).unwrap();
    assert_eq!(synthesis.status, NodeStatus::Failed);
    assert!(synthesis.error.as_deref().unwrap().contains("JSON"));
}
