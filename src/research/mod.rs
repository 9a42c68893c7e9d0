//! Research Coordination
//!
//! Ties the pieces of a run together: a search operation for the fan-out, a
//! synthesizer for the fan-in, and the runner that schedules them.
//!
//! # Usage
//!
//! ```ignore
//! use scatter::research::ResearchCoordinator;
//!
//! let coordinator = ResearchCoordinator::from_config(&config).await?;
//! let results = coordinator
//!     .research(&["rust async", "tokio internals"], CancellationToken::new())
//!     .await?;
//!
//! if let Some(doc) = results.document("synthesis") {
//!     println!("{}", doc.summary);
//! }
//! ```
//!
//! # Synthesis
//!
//! - [`DigestSynthesizer`] - deterministic, works offline (default)
//! - [`LlmSynthesizer`] - prompts an [`LLMClient`](crate::llm::LLMClient)
//!   with the node's agent profile and the output schema

/// Per-run assembly of graph, executor and runner.
pub mod coordinator;
/// Fan-in strategies.
pub mod synthesizer;

pub use coordinator::ResearchCoordinator;
pub use synthesizer::{DigestSynthesizer, LlmSynthesizer, Synthesizer};
