//! CLI argument definitions for the intake field mapper.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "intake",
    version,
    about = "Map loan and mortgage application fields to canonical intake fields",
    long_about = "Map loan and mortgage application fields to canonical intake fields.\n\n\
                  Flattens a nested application record, tags each field by topic,\n\
                  and ranks canonical fields by confidence for every observed field."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow applicant values in trace logs (redacted otherwise).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Canonical field registry JSON to use instead of the embedded one.
    #[arg(long = "registry", value_name = "PATH", global = true)]
    pub registry: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rank canonical fields for every field of an application record.
    Match(MatchArgs),

    /// List the canonical field registry.
    Fields,
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Application JSON: a nested record, or observations with --enriched.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Treat INPUT as already-enriched observations keyed by field.
    #[arg(long = "enriched")]
    pub enriched: bool,

    /// Skip topic tagging; tag scores will be zero.
    #[arg(long = "no-tags")]
    pub no_tags: bool,

    /// Keep at most N candidates per field in matches.json.
    #[arg(long = "top-n", value_name = "N")]
    pub top_n: Option<usize>,

    /// Drop candidates scoring below this in matches.json.
    #[arg(long = "min-score", value_name = "SCORE", default_value_t = 0.0)]
    pub min_score: f64,

    /// Output directory (default: the directory of INPUT).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also write enriched.json and tagged.json.
    #[arg(long = "write-intermediate")]
    pub write_intermediate: bool,

    /// Report format printed to stdout.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,

    /// Rank fields on all cores.
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Observations per classifier batch.
    #[arg(long = "batch-size", value_name = "N", default_value_t = intake_ingest::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// How fields are tagged.
    #[arg(long = "classifier", value_enum, default_value = "keyword")]
    pub classifier: ClassifierArg,

    /// Generate endpoint for --classifier ollama.
    #[arg(long = "classifier-url", value_name = "URL", default_value = intake_ingest::DEFAULT_ENDPOINT)]
    pub classifier_url: String,

    /// Model name for --classifier ollama.
    #[arg(long = "classifier-model", value_name = "MODEL", default_value = intake_ingest::DEFAULT_MODEL)]
    pub classifier_model: String,

    /// Per-request timeout for --classifier ollama, in seconds.
    #[arg(long = "classifier-timeout", value_name = "SECS", default_value_t = 120)]
    pub classifier_timeout: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassifierArg {
    /// Offline keyword rules.
    Keyword,
    /// A language model behind an Ollama-compatible endpoint.
    Ollama,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    /// Summary table.
    Table,
    /// Full ranked candidates with score breakdowns, as JSON.
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
