//! Workflow Graph and Runner
//!
//! A research run is a small dependency graph: search nodes fan out, one
//! synthesis node fans their results back in.
//!
//! # Configuration
//!
//! Scheduling is configured in `research.toml`:
//!
//! ```toml
//! [workflow]
//! queries = ["rust async", "tokio internals"]
//! process = "staged"
//! max_concurrency = 4
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let graph = WorkflowGraph::build(&["rust async", "tokio internals"]);
//! let runner = WorkflowRunner::new(Arc::new(executor))
//!     .with_config(RunnerConfig::default().with_max_concurrency(2));
//! let results = runner.run(&graph).await?;
//! for (name, record) in results.iter() {
//!     println!("{}: {:?}", name, record.status);
//! }
//! ```

pub mod engine;
pub mod executor;
pub mod graph;

pub use engine::{ProcessMode, RunnerConfig, WorkflowRunner, DEFAULT_MAX_CONCURRENCY};
pub use executor::{ResearchExecutor, TaskExecutor};
pub use graph::{
    search_node_name, AgentProfile, ExecutionMode, NodeTask, TaskPrompt, WorkflowGraph,
    WorkflowNode, SYNTHESIS_NODE,
};
