use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

// ============= Search Types =============

/// A single hit returned by a search, normalized from the provider's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Structured output of one search node.
///
/// `total_results` always equals `results.len()` for values built through
/// [`SearchResult::new`] or [`SearchResult::empty`]; raw values coming back
/// from an executor are held to the same rule by the schema gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResult {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub total_results: usize,
}

impl SearchResult {
    pub fn new(query: impl Into<String>, results: Vec<SearchHit>) -> Self {
        let total_results = results.len();
        Self {
            query: query.into(),
            results,
            total_results,
        }
    }

    /// The degraded result substituted for a failed or cancelled search.
    pub fn empty(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

// ============= Research Types =============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchSection {
    pub heading: String,
    pub body: String,
}

/// Final artifact produced by the synthesis node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchDocument {
    pub title: String,
    pub sections: Vec<ResearchSection>,
    pub references: Vec<String>,
    pub summary: String,
}

// ============= Node Output Types =============

/// A validated node output.
///
/// Serialized without a tag so the persisted `result` field holds the search
/// or document data directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeOutput {
    Search(SearchResult),
    Research(ResearchDocument),
}

impl NodeOutput {
    pub fn as_search(&self) -> Option<&SearchResult> {
        match self {
            NodeOutput::Search(result) => Some(result),
            NodeOutput::Research(_) => None,
        }
    }

    pub fn as_document(&self) -> Option<&ResearchDocument> {
        match self {
            NodeOutput::Research(document) => Some(document),
            NodeOutput::Search(_) => None,
        }
    }

    pub fn into_search(self) -> Option<SearchResult> {
        match self {
            NodeOutput::Search(result) => Some(result),
            NodeOutput::Research(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Search,
    Synthesis,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Search => write!(f, "search"),
            NodeKind::Synthesis => write!(f, "synthesis"),
        }
    }
}

/// Per-node lifecycle: `Pending -> Running -> {Completed, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl NodeStatus {
    /// Both terminal states unblock dependents.
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeStatus::Completed | NodeStatus::Failed)
    }
}

/// A node output wrapped with its execution metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    pub kind: NodeKind,
    pub status: NodeStatus,
    /// Validated output; a failed search still carries its degraded result.
    pub result: Option<NodeOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Final keyed collection of per-node outputs from one workflow run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMap {
    records: BTreeMap<String, NodeRecord>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, record: NodeRecord) {
        self.records.insert(record.name.clone(), record);
    }

    pub fn get(&self, name: &str) -> Option<&NodeRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// The search result stored under `name`, if that node is a search node.
    pub fn search_result(&self, name: &str) -> Option<&SearchResult> {
        self.get(name)?.result.as_ref()?.as_search()
    }

    /// The research document stored under `name`, if synthesis succeeded.
    pub fn document(&self, name: &str) -> Option<&ResearchDocument> {
        self.get(name)?.result.as_ref()?.as_document()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NodeRecord)> {
        self.records.iter()
    }

    pub fn failed(&self) -> impl Iterator<Item = &NodeRecord> {
        self.records
            .values()
            .filter(|record| record.status == NodeStatus::Failed)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============= Error Types =============

/// Failure of a single provider call. Recovered inside `SearchOperation`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("search request failed: {0}")]
    Request(String),

    #[error("search provider rate limited: {0}")]
    RateLimited(String),

    #[error("search timed out after {0:?}")]
    Timeout(Duration),

    #[error("search cancelled")]
    Cancelled,
}

/// A raw task output that does not match its declared schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{path}`: {message}")]
pub struct ValidationError {
    /// Offending field path, e.g. `results[1].url`; `$` for the root value.
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Malformed workflow definition. Fatal, raised before execution starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate node name '{0}'")]
    DuplicateNode(String),

    #[error("node '{node}' depends on unknown node '{dependency}'")]
    DanglingDependency { node: String, dependency: String },

    #[error("node '{0}' depends on itself")]
    SelfDependency(String),

    #[error("node '{node}' lists dependency '{dependency}' more than once")]
    DuplicateDependency { node: String, dependency: String },

    #[error("dependency cycle between nodes: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Workflow graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Cancelled")]
    Cancelled,
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
