//! Init command implementation
//!
//! Writes a commented `research.toml` with every default spelled out.

use super::output::{Output, Tone};
use crate::utils::toml_config::{ResearchConfig, DEFAULT_CONFIG_FILE};
use std::fs;
use std::path::PathBuf;

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// research.toml already exists and `force` was not set
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite an existing research.toml
    pub force: bool,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.section("Initializing scatter");

    let config_path = config.path.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !config.force {
        output.line(
            Tone::Warn,
            &format!("{} already exists, use --force to overwrite it", DEFAULT_CONFIG_FILE),
        );
        return InitResult::AlreadyExists;
    }

    if let Err(e) = fs::create_dir_all(&config.path) {
        output.error(&format!("Failed to create {}: {}", config.path.display(), e));
        return InitResult::Error(e.to_string());
    }

    if let Err(e) = fs::write(&config_path, ResearchConfig::template()) {
        output.error(&format!("Failed to create {}: {}", DEFAULT_CONFIG_FILE, e));
        return InitResult::Error(e.to_string());
    }
    output.created(&config_path);

    output.complete("Ready to research!");

    output.section("Next Steps");
    output.line(Tone::Note, "Edit the queries, then run:");
    output.command("scatter");
    output.line(Tone::Note, "For LLM synthesis, uncomment [llm] and start Ollama:");
    output.command("ollama serve");
    output.command("scatter --synthesizer llm");
    output.newline();

    InitResult::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_config() {
        let dir = TempDir::new().unwrap();
        let result = run(
            InitConfig {
                path: dir.path().to_path_buf(),
                force: false,
            },
            &Output::no_color(),
        );

        assert_eq!(result, InitResult::Success);
        let written = ResearchConfig::load(dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(written.workflow.queries.len(), 3);
    }

    #[test]
    fn test_init_respects_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "# mine\n").unwrap();

        let result = run(
            InitConfig {
                path: dir.path().to_path_buf(),
                force: false,
            },
            &Output::no_color(),
        );
        assert_eq!(result, InitResult::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        let result = run(
            InitConfig {
                path: dir.path().to_path_buf(),
                force: true,
            },
            &Output::no_color(),
        );
        assert_eq!(result, InitResult::Success);
        assert_ne!(fs::read_to_string(&path).unwrap(), "# mine\n");
    }

    #[test]
    fn test_init_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let result = run(
            InitConfig {
                path: nested.clone(),
                force: false,
            },
            &Output::no_color(),
        );
        assert_eq!(result, InitResult::Success);
        assert!(nested.join(DEFAULT_CONFIG_FILE).exists());
    }
}
