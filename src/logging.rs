//! Structured logging utilities for schmiede
//!
//! This module provides consistent logging patterns across the codebase.
//! All logs use structured fields for easy parsing and analysis.
//!
//! # Log Format Conventions
//!
//! - `digest`: Identity digest of a source snapshot (hex-encoded)
//! - `repository`: Source repository URL
//! - `commit`: Pinned revision
//! - `command`: External command line
//! - `path` / `artifact`: Filesystem locations

use std::{fmt as std_fmt, io};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    fmt::{self, format::Writer},
    prelude::*,
    EnvFilter,
};

/// Custom formatter that shows "schmiede" instead of full module path
struct SchmiedeFormatter {
    with_ansi: bool,
}

impl<S, N> FormatEvent<S, N> for SchmiedeFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        let meta = event.metadata();

        // Write timestamp
        write!(
            writer,
            "{} ",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6fZ")
        )?;

        // Write level with schmiede in parentheses and color if ansi enabled
        if self.with_ansi {
            let level_style = match *meta.level() {
                tracing::Level::ERROR => "\x1b[31m", // Red
                tracing::Level::WARN => "\x1b[33m",  // Yellow
                tracing::Level::INFO => "\x1b[32m",  // Green
                tracing::Level::DEBUG => "\x1b[34m", // Blue
                tracing::Level::TRACE => "\x1b[35m", // Magenta
            };
            write!(
                writer,
                "{}{:5}(schmiede)\x1b[0m: ",
                level_style,
                meta.level()
            )?;
        } else {
            write!(writer, "{:5}(schmiede): ", meta.level())?;
        }

        // Write fields and message
        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format (default for development)
    Pretty,
    /// Compact format (for CI/production)
    Compact,
    /// JSON format (for log aggregation systems)
    Json,
}

impl LogFormat {
    /// Parse from environment variable (SCHMIEDE_LOG_FORMAT)
    pub fn from_env() -> Self {
        match std::env::var("SCHMIEDE_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            "compact" => Self::Compact,
            "pretty" => Self::Pretty,
            _ => {
                // Default: pretty for dev, compact for production/CI
                if std::env::var("CI").is_ok() {
                    Self::Compact
                } else {
                    Self::Pretty
                }
            }
        }
    }
}

/// Initialize the global tracing subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "debug", "info", "warn")
/// - `SCHMIEDE_LOG_FORMAT`: Set format ("pretty", "compact", "json")
/// - `CI`: If set, defaults to compact format
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let format = LogFormat::from_env();

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .event_format(SchmiedeFormatter { with_ansi: true })
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .event_format(SchmiedeFormatter { with_ansi: false })
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_file(false)
                        .with_line_number(false)
                        .with_ansi(false)
                        .with_writer(io::stderr)
                        .json(),
                )
                .init();
        }
    }
}
