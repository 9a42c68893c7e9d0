//! # scatter - parallel search, one summary
//!
//! A small fan-out/fan-in workflow crate: N web searches run concurrently,
//! every output passes a schema gate, and a single synthesis step folds the
//! results into a research document. The whole result map is written to one
//! JSON file.
//!
//! scatter can be used in two ways:
//!
//! 1. **As a command-line tool** - Run the `scatter` binary
//! 2. **As a library** - Drive the graph and runner from your own code
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use scatter::{ResearchConfig, ResearchCoordinator, ResultSink, SYNTHESIS_NODE};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> scatter::Result<()> {
//!     let config = ResearchConfig::default();
//!     let coordinator = ResearchCoordinator::from_config(&config).await?;
//!
//!     let results = coordinator
//!         .research(&["rust async runtimes", "tokio vs async-std"], CancellationToken::new())
//!         .await?;
//!
//!     if let Some(doc) = results.document(SYNTHESIS_NODE) {
//!         println!("{}", doc.summary);
//!     }
//!     ResultSink::persist(&results, "/tmp/research.md".as_ref()).await
//! }
//! ```
//!
//! ### Custom Search Providers
//!
//! ```rust,ignore
//! use scatter::{DigestSynthesizer, ResearchCoordinator, SearchProvider};
//! use std::sync::Arc;
//!
//! let coordinator = ResearchCoordinator::new(
//!     Arc::new(MyProvider::new()),
//!     Arc::new(DigestSynthesizer::new()),
//! );
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama-backed LLM synthesis (default) |
//!
//! ## Modules
//!
//! - [`tools`] - Search provider seam and the never-failing search operation
//! - [`schema`] - Output schemas and the validation gate
//! - [`workflows`] - Workflow graph, executor seam and runner
//! - [`research`] - Synthesis strategies and per-run coordination
//! - [`sink`] - Result persistence
//! - [`llm`] - LLM client abstraction
//! - [`types`] - Common types and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line parsing and terminal output.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Synthesis and research coordination.
pub mod research;
/// Output schemas and validation.
pub mod schema;
/// Result persistence.
pub mod sink;
/// Web search.
pub mod tools;
/// Core types (results, records, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;
/// Workflow graph and runner.
pub mod workflows;

// Re-export commonly used types
pub use llm::{LLMClient, Provider};
pub use research::{DigestSynthesizer, LlmSynthesizer, ResearchCoordinator, Synthesizer};
pub use schema::SchemaKind;
pub use sink::ResultSink;
pub use tools::{DuckDuckGoProvider, SearchOperation, SearchProvider};
pub use types::{
    AppError, NodeRecord, NodeStatus, ResearchDocument, Result, ResultMap, SearchResult,
};
pub use utils::toml_config::{ConfigError, ResearchConfig};
pub use workflows::{
    ProcessMode, RunnerConfig, TaskExecutor, WorkflowGraph, WorkflowRunner, SYNTHESIS_NODE,
};
