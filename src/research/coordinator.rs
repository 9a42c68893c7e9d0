use crate::research::synthesizer::{DigestSynthesizer, LlmSynthesizer, Synthesizer};
use crate::tools::{DuckDuckGoProvider, SearchOperation, SearchProvider};
use crate::types::{AppError, Result, ResultMap};
use crate::utils::toml_config::{ResearchConfig, SynthesisStrategy};
use crate::workflows::engine::{RunnerConfig, WorkflowRunner};
use crate::workflows::executor::ResearchExecutor;
use crate::workflows::graph::{AgentProfile, WorkflowGraph};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Assembles one research run: graph, executor and runner.
///
/// Built fresh per run; nothing here is shared process-wide.
pub struct ResearchCoordinator {
    search: SearchOperation,
    synthesizer: Arc<dyn Synthesizer>,
    runner_config: RunnerConfig,
    search_agent: AgentProfile,
    summary_agent: AgentProfile,
}

impl ResearchCoordinator {
    pub fn new(provider: Arc<dyn SearchProvider>, synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self {
            search: SearchOperation::new(provider),
            synthesizer,
            runner_config: RunnerConfig::default(),
            search_agent: AgentProfile::search_specialist(),
            summary_agent: AgentProfile::research_synthesizer(),
        }
    }

    /// Build a coordinator backed by DuckDuckGo and the configured synthesizer
    pub async fn from_config(config: &ResearchConfig) -> Result<Self> {
        Self::from_config_with_provider(config, Arc::new(DuckDuckGoProvider::new())).await
    }

    /// Same as [`from_config`](Self::from_config) with an explicit search provider
    pub async fn from_config_with_provider(
        config: &ResearchConfig,
        provider: Arc<dyn SearchProvider>,
    ) -> Result<Self> {
        let synthesizer: Arc<dyn Synthesizer> = match config.synthesis.strategy {
            SynthesisStrategy::Digest => Arc::new(DigestSynthesizer::new()),
            SynthesisStrategy::Llm => {
                let llm = config.llm.as_ref().ok_or_else(|| {
                    AppError::Configuration(
                        "LLM synthesis selected but no [llm] section is configured".to_string(),
                    )
                })?;
                let client = llm.provider().create_client().await?;
                tracing::info!(model = client.model_name(), "using LLM synthesis");
                Arc::new(LlmSynthesizer::new(client))
            }
        };

        let mut search = SearchOperation::new(provider).with_max_results(config.search.max_results);
        if let Some(timeout) = config.search.timeout() {
            search = search.with_timeout(timeout);
        }

        Ok(Self {
            search,
            synthesizer,
            runner_config: config.runner_config(),
            search_agent: config.agents.search.clone(),
            summary_agent: config.agents.summary.clone(),
        })
    }

    pub fn with_search(mut self, search: SearchOperation) -> Self {
        self.search = search;
        self
    }

    pub fn with_runner_config(mut self, config: RunnerConfig) -> Self {
        self.runner_config = config;
        self
    }

    pub fn with_agents(mut self, search_agent: AgentProfile, summary_agent: AgentProfile) -> Self {
        self.search_agent = search_agent;
        self.summary_agent = summary_agent;
        self
    }

    pub fn synthesizer_name(&self) -> &str {
        self.synthesizer.name()
    }

    /// The graph [`research`](Self::research) would execute for `queries`
    pub fn graph<S: AsRef<str>>(&self, queries: &[S]) -> WorkflowGraph {
        WorkflowGraph::build_with_agents(queries, &self.search_agent, &self.summary_agent)
    }

    /// Fan the queries out, synthesize, and return every node's record
    pub async fn research<S: AsRef<str>>(
        &self,
        queries: &[S],
        cancel: CancellationToken,
    ) -> Result<ResultMap> {
        let graph = self.graph(queries);
        let executor = ResearchExecutor::new(self.search.clone(), self.synthesizer.clone());

        tracing::info!(
            queries = queries.len(),
            provider = self.search.provider_name(),
            synthesizer = self.synthesizer.name(),
            "starting research"
        );

        WorkflowRunner::new(Arc::new(executor))
            .with_config(self.runner_config.clone())
            .with_cancellation(cancel)
            .run(&graph)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ProviderHit;
    use crate::types::{NodeStatus, ProviderError};
    use crate::workflows::graph::SYNTHESIS_NODE;
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl SearchProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn text_search(
            &self,
            keywords: &str,
            max_results: usize,
        ) -> std::result::Result<Vec<ProviderHit>, ProviderError> {
            Ok((0..max_results)
                .map(|i| ProviderHit {
                    title: format!("{keywords} #{i}"),
                    href: format!("https://example.com/{i}"),
                    body: String::new(),
                })
                .collect())
        }
    }

    #[test]
    fn test_graph_carries_configured_agents() {
        let mut config = ResearchConfig::default();
        config.agents.summary.role = "Editor".to_string();

        let coordinator = ResearchCoordinator::new(
            Arc::new(EchoProvider),
            Arc::new(DigestSynthesizer::new()),
        )
        .with_agents(config.agents.search.clone(), config.agents.summary.clone());

        let graph = coordinator.graph(&["a"]);
        assert_eq!(graph.node(SYNTHESIS_NODE).unwrap().prompt.agent.role, "Editor");
    }

    #[tokio::test]
    async fn test_from_config_applies_search_settings() {
        let mut config = ResearchConfig::default();
        config.search.max_results = 2;

        let coordinator = ResearchCoordinator::from_config_with_provider(&config, Arc::new(EchoProvider))
            .await
            .unwrap();
        assert_eq!(coordinator.synthesizer_name(), "digest");

        let results = coordinator
            .research(&["x", "y"], CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.search_result("search_0").unwrap().total_results, 2);
        assert_eq!(results.get(SYNTHESIS_NODE).unwrap().status, NodeStatus::Completed);
    }

    #[tokio::test]
    async fn test_llm_strategy_without_llm_section() {
        let mut config = ResearchConfig::default();
        config.synthesis.strategy = SynthesisStrategy::Llm;

        let err = ResearchCoordinator::from_config_with_provider(&config, Arc::new(EchoProvider))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
