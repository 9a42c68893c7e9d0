//! Synthesis strategies for the fan-in node.
//!
//! A synthesizer returns a raw JSON value; the runner validates it against
//! the `ResearchDocument` schema like any other task output.

use crate::llm::{extract_json_object, LLMClient};
use crate::schema::SchemaKind;
use crate::types::{ResearchDocument, ResearchSection, Result, SearchResult};
use crate::workflows::graph::TaskPrompt;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;

#[async_trait]
pub trait Synthesizer: Send + Sync {
    fn name(&self) -> &str;

    /// Fold `results` (in declared dependency order) into a research document.
    async fn synthesize(&self, prompt: &TaskPrompt, results: &[SearchResult]) -> Result<Value>;
}

/// Deterministic, offline synthesis.
///
/// One section per query, references in first-seen order, and a summary
/// naming every query with its result count.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestSynthesizer;

impl DigestSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn digest(&self, results: &[SearchResult]) -> ResearchDocument {
        let queries: Vec<&str> = results.iter().map(|r| r.query.as_str()).collect();

        let title = if queries.is_empty() {
            "Research digest".to_string()
        } else {
            format!("Research digest: {}", queries.join("; "))
        };

        let sections = results
            .iter()
            .map(|result| ResearchSection {
                heading: result.query.clone(),
                body: if result.is_empty() {
                    "No results found.".to_string()
                } else {
                    result
                        .results
                        .iter()
                        .map(|hit| format!("- {} ({}): {}", hit.title, hit.url, hit.snippet))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            })
            .collect();

        let mut seen = HashSet::new();
        let references = results
            .iter()
            .flat_map(|r| r.results.iter())
            .filter(|hit| !hit.url.is_empty() && seen.insert(hit.url.clone()))
            .map(|hit| hit.url.clone())
            .collect();

        let summary = if results.is_empty() {
            "No searches were run.".to_string()
        } else {
            let total: usize = results.iter().map(|r| r.total_results).sum();
            let per_query = results
                .iter()
                .map(|r| format!("'{}' ({})", r.query, plural(r.total_results, "result")))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Collected {} across {}: {}.",
                plural(total, "result"),
                plural(results.len(), "search"),
                per_query
            )
        };

        ResearchDocument {
            title,
            sections,
            references,
            summary,
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun.ends_with('h')) {
        (1, _) => format!("1 {}", noun),
        (_, true) => format!("{} {}es", count, noun),
        (_, false) => format!("{} {}s", count, noun),
    }
}

#[async_trait]
impl Synthesizer for DigestSynthesizer {
    fn name(&self) -> &str {
        "digest"
    }

    async fn synthesize(&self, _prompt: &TaskPrompt, results: &[SearchResult]) -> Result<Value> {
        Ok(serde_json::to_value(self.digest(results))?)
    }
}

/// LLM-backed synthesis.
///
/// The agent profile becomes the system prompt. With `self_reflect` set the
/// model gets one chance to review and correct its own draft.
pub struct LlmSynthesizer {
    client: Box<dyn LLMClient>,
}

impl LlmSynthesizer {
    pub fn new(client: Box<dyn LLMClient>) -> Self {
        Self { client }
    }

    fn task_prompt(prompt: &TaskPrompt, results: &[SearchResult]) -> Result<String> {
        let schema = serde_json::to_string_pretty(&SchemaKind::ResearchDocument.json_schema())?;
        let context = serde_json::to_string_pretty(results)?;

        Ok(format!(
            r#"{description}

Expected output: {expected}

Search results:
{context}

Respond with a single JSON object matching this JSON Schema and nothing else:
{schema}"#,
            description = prompt.description,
            expected = prompt.expected_output,
            context = context,
            schema = schema,
        ))
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    fn name(&self) -> &str {
        "llm"
    }

    async fn synthesize(&self, prompt: &TaskPrompt, results: &[SearchResult]) -> Result<Value> {
        let system = prompt.agent.system_prompt();
        let task = Self::task_prompt(prompt, results)?;

        let mut reply = self.client.generate_with_system(&system, &task).await?;

        if prompt.agent.self_reflect {
            tracing::debug!(model = self.client.model_name(), "reviewing synthesis draft");
            let review = format!(
                "{task}\n\nA draft answer follows. Check it against the search results and the \
                 schema, fix any gaps or unsupported claims, and return only the corrected JSON \
                 object.\n\nDraft:\n{reply}"
            );
            reply = self.client.generate_with_system(&system, &review).await?;
        }

        extract_json_object(&reply)
    }
}
