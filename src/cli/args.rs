//! Command line argument parsing for the docterms CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// docterms - run terms queries against a segmented JSON corpus
#[derive(Parser, Debug, Clone)]
#[command(name = "docterms")]
#[command(about = "Match documents against a set of field values")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct DocTermsArgs {
    /// Verbosity level (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Terms query configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "DOCTERMS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl DocTermsArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose + 1
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a terms query against a corpus
    Search(SearchArgs),

    /// Show corpus statistics
    Stats(StatsArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Corpus file (JSON)
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Field to match
    #[arg(value_name = "FIELD")]
    pub field: String,

    /// Separated values
    #[arg(value_name = "VALUES", default_value = "")]
    pub values: String,

    /// Separator between values
    #[arg(short, long)]
    pub separator: Option<String>,

    /// Matching method
    #[arg(short, long)]
    pub method: Option<String>,

    /// Sub-method of docValuesTermsFilter (toplevel or persegment)
    #[arg(long)]
    pub submethod: Option<String>,

    /// Maximum number of doc ids to print
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Evaluate segments sequentially
    #[arg(long)]
    pub sequential: bool,

    /// Number of search threads
    #[arg(short, long)]
    pub threads: Option<usize>,
}

/// Arguments for corpus statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Corpus file (JSON)
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
