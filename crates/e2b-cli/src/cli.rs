//! CLI argument definitions for the E2B converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use e2b_ingest::DEFAULT_MAX_FILE_SIZE_MB;

#[derive(Parser)]
#[command(
    name = "e2b-convert",
    version,
    about = "Validate adverse event reports and convert them to ICH E2B(R2) XML",
    long_about = "Validate adverse event report forms and convert them to ICH E2B(R2) XML.\n\n\
                  Reads E2B XML and JSON forms from a directory, quarantines reports that\n\
                  fail validation, and writes one ichicsr document per valid report."
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

    /// Allow patient and reporter values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a directory of report forms to E2B(R2) XML.
    Convert(ConvertArgs),

    /// Validate a directory of report forms without writing anything.
    Validate(ValidateArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Directory containing `.xml` and `.json` report forms.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory for XML files and summary.json (default: <INPUT_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for quarantined validation results (default: <OUTPUT_DIR>/errors).
    #[arg(long = "error-dir", value_name = "DIR")]
    pub error_dir: Option<PathBuf>,

    /// Refuse input files larger than this many megabytes.
    #[arg(long = "max-file-size-mb", value_name = "MB", default_value_t = DEFAULT_MAX_FILE_SIZE_MB)]
    pub max_file_size_mb: u64,

    /// Map sex and drug characterization codes without collapsing.
    ///
    /// By default sex code 2 is female and everything else, unknown included,
    /// is male; drug characterization 1 is suspect and everything else
    /// concomitant. Strict mapping keeps unknown sex (code 0) and interacting
    /// drugs (code 3). The reported codes are written to the XML either way.
    #[arg(long = "strict-mapping")]
    pub strict_mapping: bool,

    /// Occurrence country written to every report (default: from the report, else US).
    #[arg(long = "occurrence-country", value_name = "CC")]
    pub occurrence_country: Option<String>,

    /// Message sender identifier override.
    #[arg(long = "sender-id", value_name = "ID")]
    pub sender_id: Option<String>,

    /// Message receiver identifier override.
    #[arg(long = "receiver-id", value_name = "ID")]
    pub receiver_id: Option<String>,

    /// Transmission date (CCYYMMDD) for reports that do not carry one.
    #[arg(long = "transmission-date", value_name = "DATE", value_parser = parse_e2b_date)]
    pub transmission_date: Option<String>,

    /// Validate and convert without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write each standardized record as JSON under <OUTPUT_DIR>/json.
    #[arg(long = "write-json")]
    pub write_json: bool,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Directory containing `.xml` and `.json` report forms.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Refuse input files larger than this many megabytes.
    #[arg(long = "max-file-size-mb", value_name = "MB", default_value_t = DEFAULT_MAX_FILE_SIZE_MB)]
    pub max_file_size_mb: u64,
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

fn parse_e2b_date(value: &str) -> Result<String, String> {
    if e2b_validate::validate_date_format(value) {
        Ok(value.to_string())
    } else {
        Err(format!("expected CCYY, CCYYMM or CCYYMMDD digits, got {value:?}"))
    }
}
