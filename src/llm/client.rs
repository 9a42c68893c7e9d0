//! LLM Client abstractions and provider selection
//!
//! Only what synthesis needs: plain and system-prompted generation.
//! - **Ollama**: local inference, enabled by the `ollama` feature (default)

use crate::types::{AppError, Result};
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    /// Ollama local LLM provider
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.2".to_string(),
    /// };
    /// ```
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Create an LLM client for this provider
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "ollama")]
            Provider::Ollama { base_url, model } => Ok(Box::new(
                super::ollama::OllamaClient::new(base_url.clone(), model.clone()).await?,
            )),

            #[cfg(not(feature = "ollama"))]
            Provider::Ollama { model, .. } => Err(AppError::Configuration(format!(
                "cannot use Ollama model '{}': built without the `ollama` feature",
                model
            ))),
        }
    }
}

/// Pull the first JSON object out of a model reply.
///
/// Models often wrap JSON in prose or Markdown fences; everything outside the
/// outermost braces is discarded.
pub fn extract_json_object(reply: &str) -> Result<serde_json::Value> {
    let start = reply.find('{');
    let end = reply.rfind('}');

    match (start, end) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&reply[start..=end])
            .map_err(|e| AppError::LLM(format!("model reply is not valid JSON: {}", e))),
        _ => Err(AppError::LLM(
            "model reply does not contain a JSON object".to_string(),
        )),
    }
}
