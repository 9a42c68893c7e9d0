//! LLM Provider Clients and Abstractions
//!
//! Used by LLM-backed synthesis. Provider-specific implementations sit
//! behind [`LLMClient`], so the rest of the crate works with any of them.
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `ollama` - Local Ollama server (default)
//!
//! # Example
//!
//! ```ignore
//! use scatter::llm::Provider;
//!
//! let provider = Provider::Ollama {
//!     base_url: "http://localhost:11434".to_string(),
//!     model: "llama3.2".to_string(),
//! };
//! let client = provider.create_client().await?;
//! let reply = client.generate_with_system("Be brief.", "What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::{extract_json_object, LLMClient, Provider};
