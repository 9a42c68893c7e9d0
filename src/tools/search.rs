//! Search operation and providers
//!
//! [`SearchOperation`] is the only place a search provider is called. It
//! returns an explicit `Result` internally ([`SearchOperation::try_execute`])
//! and degrades to an empty [`SearchResult`] at its public boundary
//! ([`SearchOperation::execute`]), so one failing query never blocks the
//! rest of a workflow.
//!
//! The default provider uses the daedra crate, which queries DuckDuckGo.

use crate::types::{ProviderError, SearchHit, SearchResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Result cap applied to every search unless configured otherwise.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// A hit in the provider's own vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHit {
    pub title: String,
    pub href: String,
    pub body: String,
}

impl From<ProviderHit> for SearchHit {
    fn from(hit: ProviderHit) -> Self {
        SearchHit {
            title: hit.title,
            url: hit.href,
            snippet: hit.body,
        }
    }
}

/// External text-search backend.
///
/// Implementations must be callable concurrently from several search nodes.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn text_search(
        &self,
        keywords: &str,
        max_results: usize,
    ) -> Result<Vec<ProviderHit>, ProviderError>;
}

/// Web search powered by daedra (DuckDuckGo backend)
pub struct DuckDuckGoProvider;

impl DuckDuckGoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuckDuckGoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn text_search(
        &self,
        keywords: &str,
        max_results: usize,
    ) -> Result<Vec<ProviderHit>, ProviderError> {
        let search_args = daedra::SearchArgs {
            query: keywords.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: max_results,
                ..Default::default()
            }),
        };

        match daedra::tools::search::perform_search(&search_args).await {
            Ok(response) => Ok(response
                .data
                .iter()
                .map(|r| ProviderHit {
                    title: r.title.clone(),
                    href: r.url.clone(),
                    body: r.description.clone(),
                })
                .collect()),
            Err(e) => {
                let message = e.to_string();
                if message.contains("429") || message.to_lowercase().contains("rate limit") {
                    Err(ProviderError::RateLimited(message))
                } else {
                    Err(ProviderError::Request(message))
                }
            }
        }
    }
}

/// One query against a search provider.
///
/// Cheap to clone; clones share the provider.
#[derive(Clone)]
pub struct SearchOperation {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
    timeout: Option<Duration>,
}

impl SearchOperation {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            max_results: DEFAULT_MAX_RESULTS,
            timeout: None,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Run the search, reporting provider failures to the caller.
    pub async fn try_execute(&self, query: &str) -> Result<SearchResult, ProviderError> {
        let call = self.provider.text_search(query, self.max_results);

        let hits = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ProviderError::Timeout(limit))??,
            None => call.await?,
        };

        let results = hits
            .into_iter()
            .take(self.max_results)
            .map(SearchHit::from)
            .collect();

        Ok(SearchResult::new(query, results))
    }

    /// Run the search; never fails.
    ///
    /// Any provider error is logged and replaced by an empty result for `query`.
    pub async fn execute(&self, query: &str) -> SearchResult {
        match self.try_execute(query).await {
            Ok(result) => {
                tracing::debug!(
                    query,
                    provider = self.provider.name(),
                    total_results = result.total_results,
                    "search completed"
                );
                result
            }
            Err(e) => {
                tracing::warn!(
                    query,
                    provider = self.provider.name(),
                    error = %e,
                    "search failed, continuing with an empty result"
                );
                SearchResult::empty(query)
            }
        }
    }
}
