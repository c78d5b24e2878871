use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Default node for `containers` and `total`, used when neither `--target` nor config names one.
pub const DEFAULT_TARGET: &str = "shiny gold bags";

#[derive(Debug, Parser)]
#[command(
    name = "containment-graph",
    version,
    about = "Transitive containment over weighted rule files",
    long_about = "Load rules of the form '<container> contain <n> <item>, ...' and query which containers can eventually hold a target and how many items a container ends up holding. Cyclic rule sets are reported as errors."
)]
pub struct Cli {
    /// Suppress informational output
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
    /// Report each container found on stderr and enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Count the nodes that can eventually contain the target
    Containers {
        /// Rule file to load
        source: PathBuf,
        /// Node to look for (default: config `target`, then "shiny gold bags")
        #[arg(short, long)]
        target: Option<String>,
        /// Print the matching containers as well as the count
        #[arg(long, default_value_t = false)]
        list: bool,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format: text or json (default: config `query.default_format`, then text)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Total number of items the target ends up holding
    Total {
        /// Rule file to load
        source: PathBuf,
        /// Container to expand (default: config `target`, then "shiny gold bags")
        #[arg(short, long)]
        target: Option<String>,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format: text or json (default: config `query.default_format`, then text)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// List nodes reachable from a container with their counts
    Reachable {
        /// Rule file to load
        source: PathBuf,
        /// Container to expand
        #[arg(long)]
        from: String,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format: text or json (default: config `query.default_format`, then text)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Skip the first N rows
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Limit number of rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List every node named by the rules, in first-seen order
    Nodes {
        /// Rule file to load
        source: PathBuf,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format: text or json (default: config `query.default_format`, then text)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Skip the first N rows
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Limit number of rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
