//! CLI argument definitions for the schema matcher.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "smatch",
    version,
    about = "Schema matcher - find corresponding columns across databases",
    long_about = "Find corresponding columns between a table and other schemas.\n\n\
                  Schemas come from an Apache Atlas catalog or from a directory of CSV files.\n\
                  Matching combines name similarity with the structure of the schemas."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// Match a table against the other tables of its own database.
    WithinDb {
        /// Table identifier (catalog guid, or `db/table` for --datasets).
        #[arg(value_name = "TABLE")]
        table: String,
    },

    /// Match a table against another database.
    OtherDb {
        /// Table identifier (catalog guid, or `db/table` for --datasets).
        #[arg(value_name = "TABLE")]
        table: String,

        /// Database identifier (catalog guid, or directory name for --datasets).
        #[arg(value_name = "DB")]
        database: String,
    },

    /// Match a table against every known database.
    Holistic {
        /// Table identifier (catalog guid, or `db/table` for --datasets).
        #[arg(value_name = "TABLE")]
        table: String,
    },
}

/// Where schemas are read from.
#[derive(Args)]
pub struct SourceArgs {
    /// TOML file with [cupid], [retrieval] and [atlas] settings.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory whose sub-directories are databases of CSV tables.
    #[arg(long = "datasets", value_name = "DIR", global = true)]
    pub datasets: Option<PathBuf>,

    /// Base URL of the Atlas catalog.
    #[arg(long = "atlas-url", value_name = "URL", env = "SMATCH_ATLAS_URL", global = true)]
    pub atlas_url: Option<String>,

    #[arg(long = "atlas-user", value_name = "USER", env = "SMATCH_ATLAS_USER", global = true)]
    pub atlas_user: Option<String>,

    #[arg(
        long = "atlas-password",
        value_name = "PASSWORD",
        env = "SMATCH_ATLAS_PASSWORD",
        hide_env_values = true,
        global = true
    )]
    pub atlas_password: Option<String>,

    /// Catalog request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Parallel workers for catalog retrieval.
    #[arg(long = "parallelism", value_name = "N", global = true)]
    pub parallelism: Option<usize>,

    /// Table identifiers per bulk catalog request.
    #[arg(long = "chunk-size", value_name = "N", global = true)]
    pub chunk_size: Option<usize>,
}

/// Matcher parameters. Unset flags fall back to the config file, then to
/// the built-in defaults.
#[derive(Args)]
pub struct TuningArgs {
    #[arg(long = "leaf-w-struct", value_name = "W", global = true)]
    pub leaf_w_struct: Option<f64>,

    #[arg(long = "w-struct", value_name = "W", global = true)]
    pub w_struct: Option<f64>,

    /// Minimum score for an accepted match.
    #[arg(long = "th-accept", value_name = "TH", global = true)]
    pub th_accept: Option<f64>,

    #[arg(long = "th-high", value_name = "TH", global = true)]
    pub th_high: Option<f64>,

    #[arg(long = "th-low", value_name = "TH", global = true)]
    pub th_low: Option<f64>,

    #[arg(long = "c-inc", value_name = "C", global = true)]
    pub c_inc: Option<f64>,

    #[arg(long = "c-dec", value_name = "C", global = true)]
    pub c_dec: Option<f64>,

    #[arg(long = "th-ns", value_name = "TH", global = true)]
    pub th_ns: Option<f64>,

    /// Keep at most this many matches.
    #[arg(long = "max-matches", value_name = "N", global = true)]
    pub max_matches: Option<usize>,

    /// Output format for the ranked matches.
    #[arg(long = "output", value_enum, default_value = "json", global = true)]
    pub output: OutputFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Table,
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
