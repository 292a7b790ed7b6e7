//! Structured logging setup.
//!
//! Configured from `CRDGEN_LOG_*` environment variables. `RUST_LOG`, when
//! set, takes precedence over `CRDGEN_LOG_LEVEL`. Logs are written to stderr
//! so the run summary on stdout stays readable.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: pretty for terminals, JSON for log shippers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty, // Default to pretty
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated), e.g. `crdgen::schema=debug`
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("CRDGEN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("CRDGEN_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
            target_filter: env::var("CRDGEN_LOG_TARGET_FILTER").ok(),
            include_location: env::var("CRDGEN_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the filter: `RUST_LOG` if set, else the configured level, plus any
/// target directives.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    let level = parse_level(&config.log_level);
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',') {
            let filter = filter.trim();
            if !filter.is_empty() {
                if let Ok(directive) = filter.parse() {
                    env_filter = env_filter.add_directive(directive);
                } else {
                    eprintln!("Warning: Invalid log filter directive: {}", filter);
                }
            }
        }
    }
    env_filter
}

/// Initialize the global tracing subscriber.
///
/// # Example
///
/// ```no_run
/// use crdgen::logging::{init_logging_with_config, LogConfig};
///
/// init_logging_with_config(&LogConfig::from_env())
///     .expect("Failed to initialize logging");
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}
