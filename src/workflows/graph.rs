//! Workflow Graph
//!
//! A fixed fan-out/fan-in shape: N independent search nodes feeding one
//! synthesis node. Arbitrary node lists can also be assembled with
//! [`WorkflowGraph::from_nodes`], which rejects malformed definitions.
//!
//! ```text
//!      search_0   search_1   ...   search_{N-1}      (stage 1, concurrent)
//!          \          |                 /
//!           +---------+----------------+
//!                     |
//!                 synthesis                          (stage 2)
//! ```

use crate::schema::SchemaKind;
use crate::types::{GraphError, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Name of the single synthesis node built by [`WorkflowGraph::build`].
pub const SYNTHESIS_NODE: &str = "synthesis";

/// Deterministic name of the search node at position `index`.
pub fn search_node_name(index: usize) -> String {
    format!("search_{}", index)
}

/// How a node shares the runtime with other ready nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Runs alongside any other ready node.
    #[default]
    Concurrent,
    /// Runs only when nothing else is in flight.
    Sequential,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Concurrent => write!(f, "concurrent"),
            ExecutionMode::Sequential => write!(f, "sequential"),
        }
    }
}

/// Persona attached to a task.
///
/// Prompt content for an LLM-backed executor; the runner never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub backstory: String,
    /// Ask the executor to review its own draft once before answering.
    #[serde(default)]
    pub self_reflect: bool,
}

impl AgentProfile {
    pub fn search_specialist() -> Self {
        Self {
            name: "AsyncSearchAgent".to_string(),
            role: "Search Specialist".to_string(),
            goal: "Perform fast parallel searches with structured results".to_string(),
            backstory: "Expert in efficient data retrieval and parallel search operations"
                .to_string(),
            self_reflect: false,
        }
    }

    pub fn research_synthesizer() -> Self {
        Self {
            name: "SummaryAgent".to_string(),
            role: "Research Synthesizer".to_string(),
            goal: "Create concise summaries from multiple search results".to_string(),
            backstory: "Expert in analyzing and synthesizing information from multiple sources"
                .to_string(),
            self_reflect: true,
        }
    }

    /// Render the profile as a system prompt.
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::new();
        if !self.role.is_empty() {
            prompt.push_str(&format!("You are a {}.", self.role));
        }
        if !self.goal.is_empty() {
            prompt.push_str(&format!(" Your goal: {}.", self.goal));
        }
        if !self.backstory.is_empty() {
            prompt.push_str(&format!(" {}.", self.backstory));
        }
        prompt.trim().to_string()
    }
}

/// Natural-language task content passed through to the executor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskPrompt {
    pub description: String,
    pub expected_output: String,
    pub agent: AgentProfile,
}

/// The work a node performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeTask {
    Search { query: String },
    Synthesis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub name: String,
    pub task: NodeTask,
    /// Declared dependency order; synthesis context follows this order.
    pub dependencies: Vec<String>,
    pub execution_mode: ExecutionMode,
    pub schema: SchemaKind,
    pub prompt: TaskPrompt,
}

impl WorkflowNode {
    /// A dependency-free concurrent search node.
    pub fn search(name: impl Into<String>, query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            name: name.into(),
            prompt: TaskPrompt {
                description: format!("Search for '{}' and return structured results.", query),
                expected_output: "SearchResult model with search data".to_string(),
                agent: AgentProfile::search_specialist(),
            },
            task: NodeTask::Search { query },
            dependencies: Vec::new(),
            execution_mode: ExecutionMode::Concurrent,
            schema: SchemaKind::SearchResult,
        }
    }

    /// A sequential synthesis node over `dependencies`.
    pub fn synthesis(name: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            task: NodeTask::Synthesis,
            dependencies,
            execution_mode: ExecutionMode::Sequential,
            schema: SchemaKind::ResearchDocument,
            prompt: TaskPrompt {
                description: "Analyze all search results and create a concise summary."
                    .to_string(),
                expected_output: "Well-structured research document".to_string(),
                agent: AgentProfile::research_synthesizer(),
            },
        }
    }

    pub fn with_agent(mut self, agent: AgentProfile) -> Self {
        self.prompt.agent = agent;
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.task {
            NodeTask::Search { .. } => NodeKind::Search,
            NodeTask::Synthesis => NodeKind::Synthesis,
        }
    }

    pub fn query(&self) -> Option<&str> {
        match &self.task {
            NodeTask::Search { query } => Some(query),
            NodeTask::Synthesis => None,
        }
    }
}

/// An immutable, validated set of workflow nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowGraph {
    nodes: Vec<WorkflowNode>,
}

impl WorkflowGraph {
    /// One search node per query plus a synthesis node depending on all of them.
    pub fn build<S: AsRef<str>>(queries: &[S]) -> Self {
        Self::build_with_agents(
            queries,
            &AgentProfile::search_specialist(),
            &AgentProfile::research_synthesizer(),
        )
    }

    pub fn build_with_agents<S: AsRef<str>>(
        queries: &[S],
        search_agent: &AgentProfile,
        summary_agent: &AgentProfile,
    ) -> Self {
        let mut nodes: Vec<WorkflowNode> = queries
            .iter()
            .enumerate()
            .map(|(i, query)| {
                WorkflowNode::search(search_node_name(i), query.as_ref())
                    .with_agent(search_agent.clone())
            })
            .collect();

        let dependencies = nodes.iter().map(|n| n.name.clone()).collect();
        nodes.push(
            WorkflowNode::synthesis(SYNTHESIS_NODE, dependencies).with_agent(summary_agent.clone()),
        );

        Self { nodes }
    }

    /// Assemble a graph from explicit nodes, rejecting malformed definitions.
    pub fn from_nodes(nodes: Vec<WorkflowNode>) -> Result<Self, GraphError> {
        let graph = Self { nodes };
        graph.validate()?;
        Ok(graph)
    }

    pub fn nodes(&self) -> &[WorkflowNode] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn search_nodes(&self) -> impl Iterator<Item = &WorkflowNode> {
        self.nodes.iter().filter(|n| n.kind() == NodeKind::Search)
    }

    /// Check names, dependency references and acyclicity.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut names = HashSet::new();
        for node in &self.nodes {
            if !names.insert(node.name.as_str()) {
                return Err(GraphError::DuplicateNode(node.name.clone()));
            }
        }

        for node in &self.nodes {
            let mut seen = HashSet::new();
            for dependency in &node.dependencies {
                if dependency == &node.name {
                    return Err(GraphError::SelfDependency(node.name.clone()));
                }
                if !names.contains(dependency.as_str()) {
                    return Err(GraphError::DanglingDependency {
                        node: node.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
                if !seen.insert(dependency.as_str()) {
                    return Err(GraphError::DuplicateDependency {
                        node: node.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        self.stages().map(|_| ())
    }

    /// Dependency layers: every node in stage `k` depends only on earlier stages.
    ///
    /// Within a stage nodes keep their declaration order.
    pub fn stages(&self) -> Result<Vec<Vec<&WorkflowNode>>, GraphError> {
        let mut remaining: HashMap<&str, usize> = self
            .nodes
            .iter()
            .map(|n| (n.name.as_str(), n.dependencies.len()))
            .collect();
        let mut placed: HashSet<&str> = HashSet::new();
        let mut stages = Vec::new();

        while placed.len() < self.nodes.len() {
            let stage: Vec<&WorkflowNode> = self
                .nodes
                .iter()
                .filter(|n| !placed.contains(n.name.as_str()))
                .filter(|n| remaining.get(n.name.as_str()) == Some(&0))
                .collect();

            if stage.is_empty() {
                let mut stuck: Vec<String> = self
                    .nodes
                    .iter()
                    .filter(|n| !placed.contains(n.name.as_str()))
                    .map(|n| n.name.clone())
                    .collect();
                stuck.sort();
                return Err(GraphError::Cycle(stuck));
            }

            for node in &stage {
                placed.insert(node.name.as_str());
            }
            for node in &self.nodes {
                let satisfied = node
                    .dependencies
                    .iter()
                    .filter(|d| stage.iter().any(|s| &s.name == *d))
                    .count();
                if let Some(count) = remaining.get_mut(node.name.as_str()) {
                    *count = count.saturating_sub(satisfied);
                }
            }
            stages.push(stage);
        }

        Ok(stages)
    }

    /// All nodes flattened in stage order.
    pub fn topological_order(&self) -> Result<Vec<&WorkflowNode>, GraphError> {
        Ok(self.stages()?.into_iter().flatten().collect())
    }
}
