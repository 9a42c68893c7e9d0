//! Workflow Runner
//!
//! Executes a [`WorkflowGraph`] node by node according to each node's
//! dependencies, producing a [`ResultMap`].
//!
//! Per-node state machine:
//!
//! ```text
//! Pending --(all dependencies terminal)--> Running --> Completed
//!                                                  \-> Failed
//! ```
//!
//! A failed search node still hands an empty `SearchResult` downstream, so one
//! broken branch never blocks synthesis. Only a malformed graph aborts a run.

use crate::types::{
    AppError, NodeKind, NodeOutput, NodeRecord, NodeStatus, ResultMap, Result, SearchResult,
};
use crate::workflows::executor::TaskExecutor;
use crate::workflows::graph::{ExecutionMode, WorkflowGraph, WorkflowNode};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Upper bound on nodes in flight unless configured otherwise.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Scheduling policy for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessMode {
    /// Ready concurrent nodes run together; sequential nodes run alone.
    #[default]
    Staged,
    /// One node at a time, in topological order.
    Sequential,
}

impl std::fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessMode::Staged => write!(f, "staged"),
            ProcessMode::Sequential => write!(f, "sequential"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub max_concurrency: usize,
    pub process: ProcessMode,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            process: ProcessMode::default(),
        }
    }
}

impl RunnerConfig {
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_process(mut self, process: ProcessMode) -> Self {
        self.process = process;
        self
    }
}

/// Drives one graph to completion.
///
/// Holds no per-run state, so the same runner can execute several graphs.
pub struct WorkflowRunner {
    executor: Arc<dyn TaskExecutor>,
    config: RunnerConfig,
    cancel: CancellationToken,
}

impl WorkflowRunner {
    pub fn new(executor: Arc<dyn TaskExecutor>) -> Self {
        Self {
            executor,
            config: RunnerConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an externally owned token; cancelling it aborts pending searches.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute `graph` and return every node's record.
    ///
    /// Individual node failures are recorded, not raised. Errors only when the
    /// graph itself is malformed.
    pub async fn run(&self, graph: &WorkflowGraph) -> Result<ResultMap> {
        graph.validate()?;
        let order = graph.topological_order()?;

        let semaphore = Semaphore::new(self.config.max_concurrency.max(1));
        let mut status: HashMap<&str, NodeStatus> = order
            .iter()
            .map(|node| (node.name.as_str(), NodeStatus::Pending))
            .collect();
        let mut results = ResultMap::new();
        let mut running = FuturesUnordered::new();
        let mut exclusive = false;

        tracing::info!(
            nodes = graph.len(),
            max_concurrency = self.config.max_concurrency,
            process = %self.config.process,
            "workflow started"
        );

        loop {
            if !exclusive {
                for node in &order {
                    if status.get(node.name.as_str()) != Some(&NodeStatus::Pending) {
                        continue;
                    }

                    let ready = node.dependencies.iter().all(|d| {
                        status
                            .get(d.as_str())
                            .is_some_and(|s| s.is_terminal())
                    });
                    if !ready {
                        continue;
                    }

                    let solo = self.config.process == ProcessMode::Sequential
                        || node.execution_mode == ExecutionMode::Sequential;
                    if solo && !running.is_empty() {
                        break;
                    }

                    let context: Vec<NodeOutput> = node
                        .dependencies
                        .iter()
                        .filter_map(|d| results.get(d).and_then(|r| r.result.clone()))
                        .collect();

                    status.insert(node.name.as_str(), NodeStatus::Running);
                    tracing::debug!(node = %node.name, from = "pending", to = "running", "node transition");
                    running.push(self.execute_node(node, context, &semaphore));

                    if solo {
                        exclusive = true;
                        break;
                    }
                }
            }

            let Some(record) = running.next().await else {
                break;
            };

            if let Some(state) = status.get_mut(record.name.as_str()) {
                *state = record.status;
            }
            tracing::debug!(node = %record.name, from = "running", to = ?record.status, "node transition");
            results.insert(record);

            if running.is_empty() {
                exclusive = false;
            }
        }

        let failed = results.failed().count();
        tracing::info!(
            completed = results.len() - failed,
            failed,
            "workflow finished"
        );

        Ok(results)
    }

    async fn execute_node(
        &self,
        node: &WorkflowNode,
        context: Vec<NodeOutput>,
        semaphore: &Semaphore,
    ) -> NodeRecord {
        let _permit = semaphore.acquire().await.ok();
        let started_at = Utc::now();
        let clock = Instant::now();

        let raw = if node.kind() == NodeKind::Search {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(AppError::Cancelled),
                raw = self.executor.execute(node, context) => raw,
            }
        } else {
            self.executor.execute(node, context).await
        };

        let outcome = raw.and_then(|value| node.schema.validate(&value).map_err(AppError::from));
        let duration_ms = clock.elapsed().as_millis() as u64;
        let finished_at = Utc::now();

        match outcome {
            Ok(output) => {
                tracing::info!(node = %node.name, kind = %node.kind(), duration_ms, "node completed");
                NodeRecord {
                    name: node.name.clone(),
                    kind: node.kind(),
                    status: NodeStatus::Completed,
                    result: Some(output),
                    error: None,
                    started_at,
                    finished_at,
                    duration_ms,
                }
            }
            Err(e) => {
                tracing::warn!(node = %node.name, kind = %node.kind(), error = %e, "node failed");
                NodeRecord {
                    name: node.name.clone(),
                    kind: node.kind(),
                    status: NodeStatus::Failed,
                    result: node
                        .query()
                        .map(|query| NodeOutput::Search(SearchResult::empty(query))),
                    error: Some(e.to_string()),
                    started_at,
                    finished_at,
                    duration_ms,
                }
            }
        }
    }
}
