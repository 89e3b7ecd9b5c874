//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! All logging is routed through `tracing` spans for consistent observability.
//!
//! # Log Levels
//!
//! - `error`: fatal errors
//! - `warn`: missing inputs, spreadsheet error cells
//! - `info`: loaded tables and merge summary counts
//! - `debug`: table shaping and plan execution details
//! - `trace`: row-level data (requires explicit `--log-data` flag)
//!
//! # Usage
//!
//! ```ignore
//! use gnb_cli::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::default().with_log_data(true);
//! init_logging(&config)?;
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder used when row-level logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Crates whose events follow the configured level.
const WORKSPACE_CRATES: [&str; 6] = [
    "gnb",
    "gnb_cli",
    "gnb_ingest",
    "gnb_merge",
    "gnb_model",
    "gnb_transform",
];

/// Returns true if row-level logging is explicitly enabled.
pub fn log_data_enabled() -> bool {
    LOG_DATA_ENABLED.load(Ordering::Relaxed)
}

/// Returns the input value when row-level logging is enabled, otherwise a
/// redacted token. Patient ages, sexes and virus names are row-level data.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Maximum level for workspace crates.
    pub level_filter: LevelFilter,
    /// Whether `RUST_LOG` may override `level_filter`.
    pub use_env_filter: bool,
    /// ANSI colors for the pretty and compact formats.
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    /// Whether row-level values may be logged.
    pub log_data: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-field human format.
    #[default]
    Pretty,
    /// Single-line human format.
    Compact,
    /// One JSON object per event, with timestamps and span close events.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
            log_data: false,
        }
    }
}

impl LogConfig {
    /// Set the level filter directly.
    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    /// Set output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the log file path (writes to stderr when None).
    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Enable or disable row-level logging of sample values.
    #[must_use]
    pub fn with_log_data(mut self, enable: bool) -> Self {
        self.log_data = enable;
        self
    }

    /// Default filter directives: workspace crates at the configured level,
    /// everything else at `warn`.
    pub fn filter_directives(&self) -> String {
        let level = self.level_filter.to_string().to_lowercase();
        std::iter::once("warn".to_string())
            .chain(WORKSPACE_CRATES.iter().map(|krate| format!("{krate}={level}")))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber. Call once, at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    LOG_DATA_ENABLED.store(config.log_data, Ordering::Relaxed);
    let registry = tracing_subscriber::registry().with(build_env_filter(config));
    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry.with(event_layer(config, Mutex::new(file))).init();
        }
        None => registry.with(event_layer(config, io::stderr)).init(),
    }
    Ok(())
}

fn event_layer<S, W>(config: &LogConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_target(false);
    match config.format {
        LogFormat::Json => layer.json().with_span_events(FmtSpan::CLOSE).boxed(),
        LogFormat::Compact => layer
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        LogFormat::Pretty => layer.with_ansi(config.with_ansi).without_time().boxed(),
    }
}

/// `RUST_LOG` wins when allowed and set; otherwise the configured directives.
fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let configured = || EnvFilter::new(config.filter_directives());
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| configured())
    } else {
        configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_cover_workspace_crates() {
        let config = LogConfig::default().with_level_filter(LevelFilter::DEBUG);
        assert_eq!(
            config.filter_directives(),
            "warn,gnb=debug,gnb_cli=debug,gnb_ingest=debug,gnb_merge=debug,gnb_model=debug,gnb_transform=debug"
        );
    }

    #[test]
    fn test_builder_methods() {
        let config = LogConfig::default()
            .with_format(LogFormat::Json)
            .with_log_file(Some(PathBuf::from("gnb.log")))
            .with_log_data(true);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file, Some(PathBuf::from("gnb.log")));
        assert!(config.log_data);
        assert_eq!(config.level_filter, LevelFilter::WARN);
    }

    fn capture(config: &LogConfig, emit: impl FnOnce()) -> String {
        let log = tempfile::NamedTempFile::new().unwrap();
        let filter_config = LogConfig {
            use_env_filter: false,
            ..config.clone()
        };
        let subscriber = tracing_subscriber::registry()
            .with(build_env_filter(&filter_config))
            .with(event_layer(config, Mutex::new(log.reopen().unwrap())));
        tracing::subscriber::with_default(subscriber, emit);
        std::fs::read_to_string(log.path()).unwrap()
    }

    #[test]
    fn test_json_format_writes_structured_fields() {
        let config = LogConfig::default().with_format(LogFormat::Json);
        let written = capture(&config, || tracing::warn!(rows = 2, "loaded upload"));
        assert!(written.contains("\"rows\":2"));
        assert!(written.contains("loaded upload"));
    }

    #[test]
    fn test_level_filter_applies_to_workspace_events() {
        let config = LogConfig {
            with_ansi: false,
            ..LogConfig::default().with_format(LogFormat::Compact)
        };
        let written = capture(&config, || {
            tracing::info!("hidden at warn");
            tracing::warn!(missing = 1, "input file not found");
        });
        assert!(!written.contains("hidden at warn"));
        assert!(written.contains("input file not found"));
        assert!(written.contains("missing=1"));
    }

    #[test]
    fn test_redaction_is_default() {
        assert!(!log_data_enabled());
        assert_eq!(redact_value("hCoV-19/Australia/VIC-01/2020"), REDACTED_VALUE);
    }
}
