//! Configuration utilities
//!
//! `research.toml` is parsed into [`toml_config::ResearchConfig`]; command-line
//! flags are layered on top by the CLI before validation.

/// TOML configuration, defaults and validation.
pub mod toml_config;
