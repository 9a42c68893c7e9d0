//! CLI module for scatter
//!
//! Provides command-line interface parsing for the `scatter` binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use crate::utils::toml_config::{ResearchConfig, SynthesisStrategy};
use crate::workflows::engine::ProcessMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// scatter - parallel web search with a synthesized summary
///
/// Fans a set of queries out to concurrent searches, then folds every result
/// into one research document.
#[derive(Parser, Debug)]
#[command(
    name = "scatter",
    version,
    about = "scatter - parallel web search with a synthesized summary",
    long_about = "Runs one web search per query concurrently, validates every result,\n\
                  and synthesizes them into a single research document.\n\n\
                  Run without a subcommand to execute the workflow, or use 'init' to\n\
                  scaffold a research.toml.",
    after_help = "EXAMPLES:\n    \
                  scatter                               # Run with research.toml or built-in defaults\n    \
                  scatter -q 'rust async' -q 'tokio'    # Research two queries\n    \
                  scatter plan -q 'a' -q 'b'            # Show the workflow without running it\n    \
                  scatter init                          # Write a commented research.toml"
)]
pub struct Cli {
    /// Path to the configuration file (research.toml is used if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(flatten)]
    pub run: RunArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Overrides applied on top of the loaded configuration
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Search query; repeat for several (replaces configured queries)
    #[arg(short, long = "query", value_name = "QUERY", global = true)]
    pub queries: Vec<String>,

    /// Where to write the result map
    #[arg(short, long, env = "SCATTER_OUTPUT", global = true)]
    pub output: Option<PathBuf>,

    /// Maximum hits kept per search
    #[arg(long, global = true)]
    pub max_results: Option<usize>,

    /// Maximum nodes running at once
    #[arg(long, global = true)]
    pub max_concurrency: Option<usize>,

    /// Per-search timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Run one node at a time
    #[arg(long, global = true)]
    pub sequential: bool,

    /// Synthesis strategy
    #[arg(long, value_enum, global = true)]
    pub synthesizer: Option<SynthesisStrategy>,
}

impl RunArgs {
    /// Overlay command-line values onto `config`.
    pub fn apply(&self, config: &mut ResearchConfig) {
        if !self.queries.is_empty() {
            config.workflow.queries = self.queries.clone();
        }
        if let Some(output) = &self.output {
            config.workflow.output = output.clone();
        }
        if let Some(max_results) = self.max_results {
            config.search.max_results = max_results;
        }
        if let Some(max_concurrency) = self.max_concurrency {
            config.workflow.max_concurrency = max_concurrency;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.search.timeout_secs = Some(timeout_secs);
        }
        if self.sequential {
            config.workflow.process = ProcessMode::Sequential;
        }
        if let Some(strategy) = self.synthesizer {
            config.synthesis.strategy = strategy;
        }
    }
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a commented research.toml
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing research.toml
        #[arg(short, long)]
        force: bool,
    },

    /// Print the workflow stages without running any search
    Plan,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
