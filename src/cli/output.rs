//! Console reporting for scatter runs
//!
//! Console lines are advisory; the result file is the artifact. Line text is
//! built by the free functions below so it can be checked without a terminal.

use crate::types::{NodeKind, NodeStatus, ResultMap};
use crate::workflows::graph::WorkflowNode;
use owo_colors::OwoColorize;
use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

/// How a status line is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Note,
    Warn,
    Fail,
}

impl Tone {
    fn tag(self) -> &'static str {
        match self {
            Tone::Ok => "[OK]",
            Tone::Note => "[INFO]",
            Tone::Warn => "[WARN]",
            Tone::Fail => "[ERROR]",
        }
    }
}

/// Terminal printer, colored or plain.
pub struct Output {
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!();
            println!("   {}", "  __  _  _ _|_ _|_  _  ._ ".bright_cyan().bold());
            println!("   {}", " _>  (_ (_| |_  |_ (/_ |  ".cyan().bold());
            println!(
                "\n   {} {}\n",
                "Parallel search, one summary".bright_white().bold(),
                version.dimmed()
            );
        } else {
            println!("\n     __  _  _ _|_ _|_  _  ._");
            println!("    _>  (_ (_| |_  |_ (/_ |");
            println!("\n   Parallel search, one summary {}\n", version);
        }
    }

    /// A marked status line. `Fail` goes to stderr.
    pub fn line(&self, tone: Tone, message: &str) {
        let text = if self.colored {
            match tone {
                Tone::Ok => format!("  {} {}", "✓".green().bold(), message.green()),
                Tone::Note => format!("  {} {}", "•".blue(), message),
                Tone::Warn => format!("  {} {}", "⚠".yellow().bold(), message.yellow()),
                Tone::Fail => format!("  {} {}", "✗".red().bold(), message.red()),
            }
        } else {
            format!("  {} {}", tone.tag(), message)
        };

        if tone == Tone::Fail {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }

    pub fn error(&self, message: &str) {
        self.line(Tone::Fail, message);
    }

    pub fn section(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// `Stage N` heading, 1-based.
    pub fn stage(&self, index: usize) {
        let title = format!("Stage {}", index + 1);
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    pub fn setting(&self, key: &str, value: impl Display) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.to_string().bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    pub fn plan_node(&self, node: &WorkflowNode) {
        let text = describe_node(node);
        if self.colored {
            println!("    {} {}", "•".blue(), text);
        } else {
            println!("    - {}", text);
        }
    }

    /// Outcome of one node, plus the document title for a completed synthesis.
    pub fn node_report(&self, node: &WorkflowNode, results: &ResultMap) {
        let Some((tone, message)) = node_line(node, results) else {
            return;
        };
        self.line(tone, &message);

        if node.kind() == NodeKind::Synthesis && tone == Tone::Ok {
            if let Some(doc) = results.document(&node.name) {
                self.setting("title", &doc.title);
            }
        }
    }

    pub fn created(&self, path: &Path) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                "config".dimmed(),
                path.display().bright_white()
            );
        } else {
            println!("  [CREATED] config {}", path.display());
        }
    }

    /// Shell command the user can run next.
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Closing lines of a run: where the results went and how long it took.
    pub fn finished(&self, path: &Path, elapsed: Duration) {
        self.setting("output", path.display());
        self.setting("elapsed", format!("{:.2}s", elapsed.as_secs_f64()));
        self.complete("Research complete");
    }

    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "🚀".green(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    pub fn newline(&self) {
        println!();
    }
}

/// Plan text for a node: its query for searches, its inputs otherwise.
pub fn describe_node(node: &WorkflowNode) -> String {
    match node.query() {
        Some(query) => format!("{} ({}): '{}'", node.name, node.execution_mode, query),
        None => format!(
            "{} ({}) <- {}",
            node.name,
            node.execution_mode,
            node.dependencies.join(", ")
        ),
    }
}

/// Status line for a node after a run. `None` if the node has no record.
pub fn node_line(node: &WorkflowNode, results: &ResultMap) -> Option<(Tone, String)> {
    let record = results.get(&node.name)?;
    let error = record.error.as_deref().unwrap_or("unknown error");
    let query = node.query().unwrap_or_default();

    let line = match (node.kind(), record.status) {
        (NodeKind::Search, NodeStatus::Completed) => {
            let found = results
                .search_result(&node.name)
                .map_or(0, |r| r.total_results);
            (
                Tone::Ok,
                format!("Search for '{}' found {} results", query, found),
            )
        }
        (NodeKind::Search, _) => (
            Tone::Warn,
            format!("Search for '{}' failed: {}", query, error),
        ),
        (NodeKind::Synthesis, NodeStatus::Completed) => {
            (Tone::Ok, "Synthesis completed".to_string())
        }
        (NodeKind::Synthesis, _) => (Tone::Warn, format!("Synthesis failed: {}", error)),
    };
    Some(line)
}
