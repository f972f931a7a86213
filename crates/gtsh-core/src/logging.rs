//! Tracing setup.
//!
//! The interactive shell owns the terminal, so logs go to a file through a
//! non-blocking writer. `GTSH_LOG` (EnvFilter syntax) overrides the configured
//! level.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "GTSH_LOG";

/// Keeps the background log writer alive; dropping it flushes pending lines.
#[must_use = "dropping the guard stops the log writer"]
pub struct LogGuard {
    _guard: WorkerGuard,
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Routes tracing output to the configured log file.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init_file_logging(config: &LogConfig) -> Result<LogGuard> {
    let path = config.file_path();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| std::path::PathBuf::from("."), std::path::Path::to_path_buf);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "gtsh.log".into(), std::ffi::OsStr::to_os_string);

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.level))
        .with_ansi(false)
        .with_writer(writer)
        .try_init();

    Ok(LogGuard { _guard: guard })
}

/// Logs to stderr, but only when `GTSH_LOG` is set.
///
/// Used by the one-shot subcommands whose stdout is their output.
pub fn init_stderr_logging() {
    if std::env::var_os(LOG_ENV).is_none() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .try_init();
}
