//! Library module for the trustindex CLI.
//!
//! Exposes the command-line definitions, configuration loading and report
//! persistence so they can be tested apart from the binary.

pub mod output;
pub mod settings;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use trustindex_core::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "trustindex")]
#[command(about = "Fintech data trust index: audit and score data sources")]
#[command(version)]
#[command(long_about = "
Trust Index - data quality auditing and trust scoring for fintech sources

Runs scraped datasets through a data-quality audit (completeness,
consistency, validity, uniqueness, timeliness, metadata quality) and
combines the result into a graded trust score per source.

EXAMPLES:
  trustindex run --config pipeline.json --output-dir data/processed
  trustindex run --config pipeline.json --sources fca --previous data/processed/pipeline_results_20240101_120000.json
  trustindex audit data/raw/fca.json --source fca
  trustindex score data/raw/fca.json --source fca
  trustindex metadata sources.json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full pipeline over the configured sources
    Run(RunArgs),
    /// Audit the data quality of one dataset document
    Audit(DatasetArgs),
    /// Audit and trust-score one dataset document
    Score(DatasetArgs),
    /// Audit a list of source descriptions
    Metadata(MetadataArgs),
    /// List the configured sources
    Sources(SourcesArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Pipeline configuration file
    #[arg(short, long, env = "TRUSTINDEX_CONFIG", help = "Pipeline configuration file (JSON)")]
    pub config: PathBuf,

    /// Directory reports are written to
    #[arg(
        short,
        long,
        env = "TRUSTINDEX_OUTPUT_DIR",
        default_value = "data/processed",
        help = "Directory for timestamped report files"
    )]
    pub output_dir: PathBuf,

    /// Restrict the run to these sources
    #[arg(long, value_delimiter = ',', help = "Comma-separated list of sources to run")]
    pub sources: Vec<String>,

    /// Previous run to refresh incrementally
    #[arg(
        long,
        requires = "sources",
        help = "Previous pipeline_results file; only --sources are re-run"
    )]
    pub previous: Option<PathBuf>,

    /// Enable compression
    #[arg(long, help = "Compress reports using Zstandard (.json.zst)")]
    pub compress: bool,
}

#[derive(Args, Debug)]
pub struct DatasetArgs {
    /// Dataset document (`{"metadata": ..., "data": [...]}`)
    pub dataset: PathBuf,

    /// Source name for the report
    #[arg(short, long)]
    pub source: String,

    /// Scoring configuration overriding the defaults
    #[arg(long, env = "TRUSTINDEX_SCORING_CONFIG")]
    pub scoring_config: Option<PathBuf>,

    /// Write the report here instead of printing it
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// JSON array of source descriptions
    pub descriptions: PathBuf,

    /// Write the results here instead of printing them
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SourcesArgs {
    /// Pipeline configuration file
    #[arg(short, long, env = "TRUSTINDEX_CONFIG")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all output except errors")]
    pub quiet: bool,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormatArg,
}

/// Log line format accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
