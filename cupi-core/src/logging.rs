//! Structured logging setup using the `tracing` ecosystem.
//!
//! Console output goes to stderr so command output on stdout stays
//! scriptable. An optional daily-rotated file layer records the same
//! events, in JSON when requested.
//!
//! A bare level such as "debug" applies to the cupi crates only; reqwest,
//! hyper and rustls stay at `warn` so their connection chatter does not
//! bury the API calls. Full filter directives are passed through as given.

use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling;

use crate::constants;
use crate::error::CuResult;

/// Crates whose events a bare level applies to.
const CRATE_TARGETS: [&str; 3] = ["cupi_core", "cupi_api", "cupi_cli"];

/// Level for everything outside [`CRATE_TARGETS`].
const DEPENDENCY_LEVEL: &str = "warn";

/// Turn a configured level into a filter directive.
fn filter_directive(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return filter_directive("info");
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let mut directive = DEPENDENCY_LEVEL.to_string();
    for target in CRATE_TARGETS {
        directive.push_str(&format!(",{target}={level}"));
    }
    directive
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(filter_directive(level)).unwrap_or_else(|_| EnvFilter::new(filter_directive("info")))
}

/// Initialize the global tracing subscriber with the given settings.
///
/// # Arguments
/// * `level` - Log level or filter directive: "trace", "debug", "info", "cupi_api=debug", ...
/// * `log_dir` - Directory for log files
/// * `json_output` - If true, use JSON format for file output
pub fn init_logging(level: &str, log_dir: &Path, json_output: bool) -> CuResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = rolling::daily(log_dir, constants::LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = build_filter(level);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    if json_output {
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    }

    tracing::debug!("logging initialized at level={level}, dir={}", log_dir.display());

    Ok(LogGuard { _guard: guard })
}

/// Guard that keeps the non-blocking log writer alive.
/// Drop this to flush and close the log file.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Initialize a minimal console-only logger for tests or library users.
pub fn init_console_logging(level: &str) {
    let env_filter = build_filter(level);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .try_init();
}
