//! Tracing subscriber setup for the CLI.
//!
//! - `ERDGEN_LOG_LEVEL=trace|debug|info|warn|error` sets the level (default `warn`)
//! - `ERDGEN_LOG_FORMAT=compact|pretty|json` sets the format (default `compact`)
//!
//! `--verbose` forces `debug`. Logs go to stderr so compiled output and
//! `inspect` results on stdout stay machine readable.

use std::env;
use tracing_subscriber::EnvFilter;

/// Get the configured log level.
pub fn log_level(verbose: bool) -> &'static str {
    if verbose {
        return "debug";
    }
    env::var("ERDGEN_LOG_LEVEL")
        .map(|level| match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "error" => "error",
            _ => "warn",
        })
        .unwrap_or("warn")
}

/// Get the configured log format.
pub fn log_format() -> &'static str {
    env::var("ERDGEN_LOG_FORMAT")
        .map(|format| match format.to_lowercase().as_str() {
            "pretty" => "pretty",
            "json" => "json",
            _ => "compact",
        })
        .unwrap_or("compact")
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let level = log_level(verbose);
    let filter = EnvFilter::try_new(format!(
        "erdgen_schema={},erdgen_cli={}",
        level, level
    ))
    .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = match log_format() {
        "pretty" => builder.pretty().try_init(),
        "json" => builder.json().try_init(),
        _ => builder.compact().try_init(),
    };

    if result.is_ok() {
        tracing::debug!(level, format = log_format(), "erdgen logging initialized");
    }
}
