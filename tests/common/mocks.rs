//! Mock implementations for testing.
//!
//! Search providers and LLM clients shared by the integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use scatter::llm::LLMClient;
use scatter::tools::{ProviderHit, SearchProvider};
use scatter::types::{AppError, ProviderError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted search provider.
///
/// Each query maps to a fixed number of hits, an optional delay and an
/// optional failure. Unknown queries return no hits. The provider tracks how
/// many calls are in flight so tests can assert concurrency bounds.
///
/// # Examples
///
/// ```ignore
/// let provider = MockSearchProvider::new()
///     .with_hits("A", 2)
///     .with_delay("A", Duration::from_millis(50))
///     .failing_on("B");
/// ```
#[derive(Default)]
pub struct MockSearchProvider {
    hits: HashMap<String, usize>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, ProviderError>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `count` hits for `query`.
    pub fn with_hits(mut self, query: &str, count: usize) -> Self {
        self.hits.insert(query.to_string(), count);
        self
    }

    /// Sleep for `delay` before answering `query`.
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    /// Fail every search for `query` with a request error.
    pub fn failing_on(mut self, query: &str) -> Self {
        self.failures.insert(
            query.to_string(),
            ProviderError::Request("connection reset".to_string()),
        );
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Queries in the order calls started.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of concurrent calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Build `count` deterministic hits for `query`.
pub fn hits_for(query: &str, count: usize) -> Vec<ProviderHit> {
    (0..count)
        .map(|i| ProviderHit {
            title: format!("{} result {}", query, i + 1),
            href: format!("https://example.com/{}/{}", query.replace(' ', "-"), i + 1),
            body: format!("Snippet {} for {}", i + 1, query),
        })
        .collect()
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn text_search(
        &self,
        keywords: &str,
        max_results: usize,
    ) -> std::result::Result<Vec<ProviderHit>, ProviderError> {
        self.calls.lock().unwrap().push(keywords.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(delay) = self.delays.get(keywords) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(error) = self.failures.get(keywords) {
            return Err(error.clone());
        }

        let count = self.hits.get(keywords).copied().unwrap_or(0);
        Ok(hits_for(keywords, count.min(max_results)))
    }
}

/// Mock LLM client for testing with configurable responses.
///
/// Records every prompt it receives so tests can inspect what was sent.
#[derive(Clone)]
pub struct MockLLMClient {
    responses: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<(String, String)>>>,
    should_fail: bool,
}

impl MockLLMClient {
    /// Create a new mock client that always returns the given response.
    pub fn new(response: &str) -> Self {
        Self::with_responses(&[response])
    }

    /// Return each response once, in order; the last one repeats.
    pub fn with_responses(responses: &[&str]) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.iter().rev().map(|r| r.to_string()).collect(),
            )),
            prompts: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::with_responses(&[])
        }
    }

    /// `(system, prompt)` pairs received so far.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_response(&self) -> String {
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.pop().unwrap_or_default()
        } else {
            responses.last().cloned().unwrap_or_default()
        }
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.next_response())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
