//! Logging setup
//!
//! Structured logging through `tracing`. Every layer writes to stderr or to a
//! file, never to stdout: stdout carries command output and the JSON-RPC
//! stream of the MCP server.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

pub const LOG_LEVEL_ENV: &str = "TD_LOG_LEVEL";
pub const LOG_JSON_ENV: &str = "TD_LOG_JSON";
pub const LOG_VERBOSE_ENV: &str = "TD_LOG_VERBOSE";
pub const LOG_QUIET_ENV: &str = "TD_LOG_QUIET";
pub const LOG_FILE_ENV: &str = "TD_LOG_FILE";

/// Logging configuration options
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Minimum log level to output
    pub level: Level,
    pub color: bool,
    pub show_timestamps: bool,
    pub show_target: bool,
    /// JSON lines instead of human-readable text
    pub json_format: bool,
    pub enable_spans: bool,
    /// Append to this file instead of stderr
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_mode(ApplicationMode::Cli)
    }
}

/// Application modes with different logging requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationMode {
    /// One-shot command line invocation
    Cli,
    /// Long-running stdio JSON-RPC server
    McpServer,
    Test,
}

impl LoggingConfig {
    pub fn for_mode(mode: ApplicationMode) -> Self {
        match mode {
            ApplicationMode::Cli => Self {
                level: Level::WARN,
                color: io::stderr().is_terminal(),
                show_timestamps: false,
                show_target: false,
                json_format: false,
                enable_spans: false,
                file_output: None,
            },
            ApplicationMode::McpServer => Self {
                level: Level::INFO,
                color: false,
                show_timestamps: true,
                show_target: true,
                json_format: true,
                enable_spans: false,
                file_output: None,
            },
            ApplicationMode::Test => Self {
                level: Level::DEBUG,
                color: false,
                show_timestamps: true,
                show_target: true,
                json_format: false,
                enable_spans: true,
                file_output: None,
            },
        }
    }

    /// Create config from CLI flags. `verbose` wins over `quiet`.
    pub fn from_args(quiet: bool, verbose: bool, json: bool) -> Self {
        let level = if verbose {
            Level::DEBUG
        } else if quiet {
            Level::ERROR
        } else {
            Level::WARN
        };

        Self {
            level,
            color: !quiet && !json && io::stderr().is_terminal(),
            show_timestamps: verbose || json,
            show_target: verbose,
            json_format: json,
            enable_spans: verbose,
            file_output: None,
        }
    }

    /// Overlay `TD_LOG_*` settings from a variable lookup.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| lookup(name).as_deref() == Some("true");

        if flag(LOG_VERBOSE_ENV) {
            self = Self {
                file_output: self.file_output,
                ..Self::from_args(false, true, self.json_format)
            };
        } else if flag(LOG_QUIET_ENV) {
            self.level = Level::ERROR;
        }

        if let Some(level) = lookup(LOG_LEVEL_ENV).as_deref().and_then(parse_level) {
            self.level = level;
        }
        if flag(LOG_JSON_ENV) {
            self.json_format = true;
            self.color = false;
        }
        if let Some(file) = lookup(LOG_FILE_ENV).filter(|f| !f.is_empty()) {
            self.file_output = Some(PathBuf::from(file));
        }

        self
    }
}

pub fn parse_level(value: &str) -> Option<Level> {
    match value.to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Initialize the global subscriber.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_logging(config: LoggingConfig) -> io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("task_dispatch={}", config.level)));

    let registry = Registry::default().with(env_filter);

    if let Some(log_file) = config.file_output {
        let dir = match log_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = log_file.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "Invalid log file name")
        })?;
        std::fs::create_dir_all(&dir)?;
        let file_appender = tracing_appender::rolling::never(dir, name);

        if config.json_format {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(config.enable_spans)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(file_appender),
                )
                .try_init()
                .map_err(init_error)?;
        } else {
            let layer = fmt::layer()
                .with_target(config.show_target)
                .with_ansi(false)
                .with_writer(file_appender);
            if config.show_timestamps {
                layer
                    .with_timer(fmt::time::ChronoUtc::rfc_3339())
                    .with_subscriber(registry)
                    .try_init()
                    .map_err(init_error)?;
            } else {
                layer
                    .without_time()
                    .with_subscriber(registry)
                    .try_init()
                    .map_err(init_error)?;
            }
        }
    } else if config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(config.enable_spans)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(io::stderr),
            )
            .try_init()
            .map_err(init_error)?;
    } else {
        let layer = fmt::layer()
            .with_target(config.show_target)
            .with_ansi(config.color)
            .with_writer(io::stderr);
        if config.show_timestamps {
            layer
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_subscriber(registry)
                .try_init()
                .map_err(init_error)?;
        } else {
            layer
                .without_time()
                .with_subscriber(registry)
                .try_init()
                .map_err(init_error)?;
        }
    }

    Ok(())
}

fn init_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("Failed to initialize logging: {}", e))
}

/// Initialize logging from `base` with `TD_LOG_*` overrides from the process
/// environment applied on top.
pub fn init_from_env(base: LoggingConfig) -> io::Result<()> {
    init_logging(base.apply_env(|name| std::env::var(name).ok()))
}

#[macro_export]
macro_rules! log_mcp_operation {
    ($operation:expr, $method:expr) => {
        tracing::debug!(
            operation = $operation,
            mcp_method = $method,
            "MCP operation"
        );
    };
    ($operation:expr, $method:expr, $details:expr) => {
        tracing::debug!(
            operation = $operation,
            mcp_method = $method,
            details = $details,
            "MCP operation"
        );
    };
}
