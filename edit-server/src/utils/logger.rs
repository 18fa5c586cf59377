//! Logging Infrastructure
//!
//! Structured logging with an env filter, optional JSON lines and optional
//! daily rolling files.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "edit-server";

/// Initialize the logger with defaults
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional JSON output and file output
///
/// `RUST_LOG` takes precedence over `log_level`. Files are written only
/// when `log_dir` exists.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));
    let json = json.unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir
        .map(Path::new)
        .filter(|path| path.is_dir())
        .map(|path| tracing_appender::rolling::daily(path, LOG_FILE_PREFIX));

    // try_init: a second initialization (tests) is not an error
    let result = match (json, file_appender) {
        (true, Some(appender)) => builder.json().with_writer(appender).try_init(),
        (true, None) => builder.json().try_init(),
        (false, Some(appender)) => builder.with_ansi(false).with_writer(appender).try_init(),
        (false, None) => builder.try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("Logger already initialized: {}", e);
    }
}
