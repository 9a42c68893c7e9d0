//! Node execution seam.
//!
//! The runner owns scheduling and validation; a [`TaskExecutor`] only turns a
//! node plus its dependency outputs into a raw JSON value.

use crate::research::Synthesizer;
use crate::tools::SearchOperation;
use crate::types::{NodeOutput, Result};
use crate::workflows::graph::{NodeTask, WorkflowNode};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Produce the raw output of `node`.
    ///
    /// `context` holds the outputs of `node.dependencies`, in declared order.
    async fn execute(&self, node: &WorkflowNode, context: Vec<NodeOutput>) -> Result<Value>;
}

/// Default executor: searches through a [`SearchOperation`], synthesizes
/// through a [`Synthesizer`].
#[derive(Clone)]
pub struct ResearchExecutor {
    search: SearchOperation,
    synthesizer: Arc<dyn Synthesizer>,
}

impl ResearchExecutor {
    pub fn new(search: SearchOperation, synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self {
            search,
            synthesizer,
        }
    }
}

#[async_trait]
impl TaskExecutor for ResearchExecutor {
    async fn execute(&self, node: &WorkflowNode, context: Vec<NodeOutput>) -> Result<Value> {
        match &node.task {
            NodeTask::Search { query } => {
                let result = self.search.execute(query).await;
                Ok(serde_json::to_value(result)?)
            }
            NodeTask::Synthesis => {
                let results: Vec<_> = context
                    .into_iter()
                    .filter_map(NodeOutput::into_search)
                    .collect();
                self.synthesizer.synthesize(&node.prompt, &results).await
            }
        }
    }
}
