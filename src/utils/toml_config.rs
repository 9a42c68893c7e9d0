//! TOML-based configuration for scatter
//!
//! Every section is optional. A missing file, a missing section or a missing
//! key all fall back to the defaults below, so an empty `research.toml` is a
//! valid configuration.

use crate::llm::Provider;
use crate::workflows::engine::{ProcessMode, RunnerConfig, DEFAULT_MAX_CONCURRENCY};
use crate::workflows::graph::AgentProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "research.toml";

/// Root configuration structure loaded from research.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Required when `synthesis.strategy = "llm"`
    #[serde(default)]
    pub llm: Option<LlmConfig>,

    #[serde(default)]
    pub agents: AgentsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============= Workflow Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,

    #[serde(default)]
    pub process: ProcessMode,

    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            queries: default_queries(),
            process: ProcessMode::default(),
            max_concurrency: default_max_concurrency(),
            output: default_output(),
        }
    }
}

fn default_queries() -> Vec<String> {
    vec![
        "Latest AI Developments 2024".to_string(),
        "Upcoming AI technologies and trends in 2025".to_string(),
        "AI Agents in 2025".to_string(),
    ]
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

fn default_output() -> PathBuf {
    PathBuf::from("/tmp/research.md")
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_provider")]
    pub provider: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Per-search timeout; `None` waits for the provider indefinitely
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: default_search_provider(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_search_provider() -> String {
    "duckduckgo".to_string()
}

fn default_max_results() -> usize {
    crate::tools::DEFAULT_MAX_RESULTS
}

fn default_timeout_secs() -> Option<u64> {
    Some(30)
}

// ============= Synthesis Configuration =============

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisStrategy {
    /// Deterministic offline digest
    #[default]
    Digest,
    /// Ask the configured LLM
    Llm,
}

impl std::fmt::Display for SynthesisStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthesisStrategy::Digest => write!(f, "digest"),
            SynthesisStrategy::Llm => write!(f, "llm"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default)]
    pub strategy: SynthesisStrategy,
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LlmConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
    },
}

impl LlmConfig {
    pub fn provider(&self) -> Provider {
        match self {
            LlmConfig::Ollama { base_url, model } => Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
            },
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

// ============= Agent Configuration =============

/// Agent personas attached to the nodes. A section replaces the built-in
/// profile as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default = "AgentProfile::search_specialist")]
    pub search: AgentProfile,

    #[serde(default = "AgentProfile::research_synthesizer")]
    pub summary: AgentProfile,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            search: AgentProfile::search_specialist(),
            summary: AgentProfile::research_synthesizer(),
        }
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ResearchConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_overrides(Some(path.as_ref()), |_| {})
    }

    /// Resolve the file, parse it, apply `overrides`, then validate.
    ///
    /// An explicit `path` must exist. Without one, `research.toml` in the
    /// working directory is read when present and the defaults are used
    /// otherwise.
    pub fn load_with_overrides<F>(path: Option<&Path>, overrides: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&mut Self),
    {
        let source = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            Some(path) => Some(path),
            None => Some(Path::new(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        let mut config = match source {
            Some(path) => Self::from_toml(&fs::read_to_string(path)?)?,
            None => Self::default(),
        };

        overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Parse without validating; callers apply overrides first.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate ranges and cross-section references
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.max_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "workflow.max_concurrency must be at least 1".to_string(),
            ));
        }

        if self.workflow.output.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "workflow.output must not be empty".to_string(),
            ));
        }

        if self.search.provider != "duckduckgo" {
            return Err(ConfigError::ValidationError(format!(
                "search.provider '{}' is not supported (expected 'duckduckgo')",
                self.search.provider
            )));
        }

        if self.search.max_results == 0 {
            return Err(ConfigError::ValidationError(
                "search.max_results must be at least 1".to_string(),
            ));
        }

        if self.search.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "search.timeout_secs must be positive; omit it to disable the timeout".to_string(),
            ));
        }

        if self.synthesis.strategy == SynthesisStrategy::Llm && self.llm.is_none() {
            return Err(ConfigError::ValidationError(
                "synthesis.strategy = \"llm\" requires an [llm] section".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::default()
            .with_max_concurrency(self.workflow.max_concurrency)
            .with_process(self.workflow.process)
    }

    /// Commented starting point written by `scatter init`.
    pub fn template() -> &'static str {
        CONFIG_TEMPLATE
    }
}

const CONFIG_TEMPLATE: &str = r#"# scatter configuration
#
# Every key is optional; the values below are the defaults.

[workflow]
# One search node is created per query.
queries = [
    "Latest AI Developments 2024",
    "Upcoming AI technologies and trends in 2025",
    "AI Agents in 2025",
]
# "staged" runs searches together and synthesis alone; "sequential" runs one node at a time.
process = "staged"
max_concurrency = 4
output = "/tmp/research.md"

[search]
provider = "duckduckgo"
max_results = 5
timeout_secs = 30

[synthesis]
# "digest" works offline; "llm" needs the [llm] section below.
strategy = "digest"

# [llm]
# type = "ollama"
# base_url = "http://localhost:11434"
# model = "llama3.2"

[agents.search]
name = "AsyncSearchAgent"
role = "Search Specialist"
goal = "Perform fast parallel searches with structured results"
backstory = "Expert in efficient data retrieval and parallel search operations"

[agents.summary]
name = "SummaryAgent"
role = "Research Synthesizer"
goal = "Create concise summaries from multiple search results"
backstory = "Expert in analyzing and synthesizing information from multiple sources"
self_reflect = true

[logging]
# RUST_LOG takes precedence when set.
level = "info"
format = "pretty"
"#;
