//! Tracing configuration and log routing.
//!
//! Logs go to stdout using a compact formatter and to a file. When
//! `STUDENT_RECORDS_LOG_FILE` is set, logs are appended to that path; otherwise a file logger is
//! created under `logs/student-records.log`. The file writer is non-blocking so request handlers
//! never wait on disk.
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_ENV: &str = "STUDENT_RECORDS_LOG_FILE";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "student-records.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and optional file logging.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`).
/// - Installs a compact stdout layer and, when available, a file layer.
/// - Keeps the non-blocking writer guard alive for the process lifetime.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    if let Some(writer) = configure_file_writer() {
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact();

        registry.with(file_layer).init();
    } else {
        registry.init();
    }
}

/// Where the file layer writes.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    /// Append to an explicitly configured file.
    Explicit(PathBuf),
    /// `logs/student-records.log` under the working directory.
    Default,
}

/// Pick the log destination from the configured value; blank counts as unset.
fn resolve_log_target(configured: Option<String>) -> LogTarget {
    match configured {
        Some(path) if !path.trim().is_empty() => LogTarget::Explicit(PathBuf::from(path.trim())),
        _ => LogTarget::Default,
    }
}

/// Build a non-blocking writer for file logging.
///
/// Returns `None` when the logs directory cannot be created or the target file cannot be opened.
fn configure_file_writer() -> Option<NonBlocking> {
    match resolve_log_target(std::env::var(LOG_FILE_ENV).ok()) {
        LogTarget::Explicit(path) => match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => Some(install_writer(file)),
            Err(err) => {
                eprintln!("Failed to open log file {}: {err}", path.display());
                None
            }
        },
        LogTarget::Default => {
            if let Err(err) = std::fs::create_dir_all(DEFAULT_LOG_DIR) {
                eprintln!("Failed to create logs directory: {err}");
                return None;
            }
            let appender = tracing_appender::rolling::never(DEFAULT_LOG_DIR, DEFAULT_LOG_FILE);
            Some(install_writer(appender))
        }
    }
}

fn install_writer<W>(target: W) -> NonBlocking
where
    W: std::io::Write + Send + 'static,
{
    let (non_blocking, guard) = tracing_appender::non_blocking(target);
    let _ = LOG_GUARD.set(guard);
    non_blocking
}
