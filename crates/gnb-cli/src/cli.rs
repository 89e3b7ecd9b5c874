//! CLI argument definitions for the GISAID → NCBI metadata builder.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use gnb_ingest::{ATTRIBUTE_KEY_INDEX, UPLOAD_LABEL_KEY_INDEX};
use gnb_merge::{DEFAULT_HOST, DEFAULT_HOST_DISEASE, DEFAULT_ORGANISM};
use gnb_model::Sentinel;

#[derive(Parser)]
#[command(
    name = "gnb",
    version,
    about = "GISAID to NCBI - build BioSample and SRA metadata from GISAID submissions",
    long_about = "Merge a GISAID upload spreadsheet and its GISAID download records into \
                  NCBI submission templates.\n\n\
                  Writes tab-separated tables to stdout, ready to paste into the \
                  NCBI BioSample and SRA metadata spreadsheets."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Allow row-level values (virus names, patient ages) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge GISAID metadata into an NCBI BioSample template.
    #[command(visible_alias = "merge")]
    MergeBiosample(MergeBiosampleArgs),

    /// Build NCBI SRA run metadata from BioSample attributes.
    MergeSra(MergeSraArgs),

    /// Print GISAID download records as a table.
    ViewRecords(ViewRecordsArgs),

    /// Print the version.
    Version,

    /// Run the built-in self-test scenarios.
    Test,
}

#[derive(Parser)]
pub struct MergeBiosampleArgs {
    /// NCBI BioSample template workbook (.xlsx).
    #[arg(value_name = "NCBI_TEMPLATE")]
    pub ncbi_template: PathBuf,

    /// GISAID upload workbook (.xls/.xlsx).
    #[arg(value_name = "GISAID_UPLOAD")]
    pub gisaid_upload: PathBuf,

    /// GISAID download records (.json, optionally .gz, .tar.gz or .zip).
    #[arg(value_name = "GISAID_JSON")]
    pub gisaid_json: PathBuf,

    /// BioProject accession written to every sample.
    #[arg(value_name = "BIOPROJECT")]
    pub bioproject: String,

    /// Value written for missing or unknown fields: missing, "not collected"
    /// or "not applicable".
    #[arg(
        short = 'r',
        long = "replacement",
        value_name = "SENTINEL",
        default_value = "missing"
    )]
    pub replacement: Sentinel,

    #[command(flatten)]
    pub records: RecordArgs,

    /// Organism written to every sample.
    #[arg(long = "organism", default_value = DEFAULT_ORGANISM)]
    pub organism: String,

    /// Host written to every sample.
    #[arg(long = "host", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Host disease written to every sample.
    #[arg(long = "host-disease", default_value = DEFAULT_HOST_DISEASE)]
    pub host_disease: String,
}

#[derive(Parser)]
pub struct MergeSraArgs {
    /// NCBI BioSample attributes file (attributes.tsv).
    #[arg(value_name = "ATTRIBUTES_TSV")]
    pub attributes: PathBuf,

    /// GISAID upload workbook (.xls/.xlsx).
    #[arg(value_name = "GISAID_UPLOAD")]
    pub gisaid_upload: PathBuf,

    /// NCBI SRA metadata template workbook (.xlsx).
    #[arg(value_name = "SRA_TEMPLATE")]
    pub sra_template: PathBuf,

    /// Zero-based column of the sample name in the attributes file.
    #[arg(long = "attributes-key-index", value_name = "N", default_value_t = ATTRIBUTE_KEY_INDEX)]
    pub attributes_key_index: usize,

    /// Zero-based column of the virus name in the upload label row.
    #[arg(long = "upload-key-index", value_name = "N", default_value_t = UPLOAD_LABEL_KEY_INDEX)]
    pub upload_key_index: usize,
}

#[derive(Parser)]
pub struct ViewRecordsArgs {
    /// GISAID download records (.json, optionally .gz, .tar.gz or .zip).
    #[arg(value_name = "GISAID_JSON")]
    pub gisaid_json: PathBuf,

    #[command(flatten)]
    pub records: RecordArgs,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "tsv")]
    pub format: ViewFormatArg,
}

/// Record selection shared by commands that read download records.
#[derive(Parser)]
pub struct RecordArgs {
    /// Drop a field from every record (repeatable).
    #[arg(long = "drop", value_name = "FIELD")]
    pub drop: Vec<String>,

    /// Keep only records matching this case-insensitive pattern.
    #[arg(long = "filter-regex", value_name = "PATTERN")]
    pub filter_regex: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewFormatArg {
    Tsv,
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
