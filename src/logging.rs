//! Log file setup
//!
//! Logs go to a file so they never interleave with the prompt on stdout.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "PLUGUP_LOG";

/// Filter used when `PLUGUP_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "plugup=info";

/// Build the filter from `directive`, falling back to [`DEFAULT_FILTER`]
pub fn env_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a subscriber appending to `log_file`
///
/// The returned guard flushes buffered lines when dropped; keep it alive for
/// the duration of the program.
pub fn init(log_file: &Path) -> std::io::Result<WorkerGuard> {
    let dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let file_name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "plugup.log".into());
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let directive = std::env::var(LOG_ENV).ok();
    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    // a subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::registry()
        .with(env_filter(directive.as_deref()))
        .with(fmt_layer)
        .try_init();

    Ok(guard)
}
