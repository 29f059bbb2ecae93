//! CLI command definitions

use clap::{Parser, ValueEnum};
use quorum_domain::{Complexity, StrategyKind};
use std::path::PathBuf;

/// Output format for consensus results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the agreed payload
    Answer,
    /// Payload with agreement, strategy and explanation
    Full,
    /// JSON output
    Json,
}

impl From<OutputFormat> for quorum_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Answer => quorum_domain::OutputFormat::Answer,
            OutputFormat::Full => quorum_domain::OutputFormat::Full,
            OutputFormat::Json => quorum_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for consensus-quorum
#[derive(Parser, Debug)]
#[command(name = "consensus-quorum")]
#[command(
    author,
    version,
    about = "Ask several model providers at once and reconcile their answers"
)]
#[command(long_about = r#"
consensus-quorum sends the same structured question to every provider of a
profile in parallel, tolerates any of them failing, and reconciles the
surviving JSON answers with a consensus strategy.

Strategies: voting, weighted-voting, hybrid, committee, ranking, augmented

Configuration files are loaded from (in priority order):
1. QUORUM_* env vars   e.g. QUORUM_CONSENSUS__STRATEGY=committee
2. --config <path>     Explicit config file
3. ./quorum.toml       Project-level config
4. ~/.config/consensus-quorum/config.toml   Global config

Example:
  consensus-quorum "Is 2^61-1 prime? Answer with {\"prime\": bool}"
  consensus-quorum --profile premium --strategy committee "Summarize RFC 9110"
  consensus-quorum --task-type security -o full "Is this regex ReDoS-prone: (a+)+$"
  consensus-quorum "Capital of France?" "Capital of Japan?"
"#)]
pub struct Cli {
    /// Questions to answer; more than one uses a single batched dispatch
    #[arg(required_unless_present = "show_config")]
    pub questions: Vec<String>,

    /// Profile to use (skips tier selection)
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Consensus strategy (overrides configuration)
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Option<StrategyKind>,

    /// Complexity hint for tier selection: simple, medium, complex, critical
    #[arg(long, value_name = "LEVEL")]
    pub complexity: Option<Complexity>,

    /// Task type for tier overrides (e.g. security, formatting)
    #[arg(long, value_name = "TYPE")]
    pub task_type: Option<String>,

    /// Caller name used to namespace cache entries
    #[arg(long, value_name = "NAME", default_value = "cli")]
    pub agent: String,

    /// Override the system prompt
    #[arg(long, value_name = "PROMPT")]
    pub system: Option<String>,

    /// Retry weak cheap-tier results on the expensive tier
    #[arg(long)]
    pub escalate: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Print a usage and cost summary after answering
    #[arg(long)]
    pub usage: bool,
}
