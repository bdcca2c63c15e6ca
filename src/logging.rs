//! Logging Setup
//!
//! Console logging through `tracing-subscriber`, plus a daily-rolling JSON
//! log file when debug mode is on.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "tts-relay.log";

#[derive(Debug, Clone)]
pub struct LogConfig {
    debug_mode: bool,
    log_dir: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            debug_mode: false,
            log_dir: PathBuf::from(".tts-relay").join("logs"),
        }
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Filter directive used when `RUST_LOG` is not set.
    fn default_directive(&self) -> &'static str {
        if self.debug_mode {
            "tts_relay=debug,teloxide=info,info"
        } else {
            "info"
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the life of the process. It is `None` when no file is written.
pub fn init_logging(config: LogConfig) -> io::Result<Option<WorkerGuard>> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.default_directive()))
    };

    let console = fmt::layer().with_target(false).compact().with_filter(filter());

    if !config.debug_mode {
        tracing_subscriber::registry().with(console).try_init().map_err(io::Error::other)?;
        return Ok(None);
    }

    std::fs::create_dir_all(&config.log_dir)?;
    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(io::Error::other)?;

    tracing::debug!("Writing debug logs to {}", config.log_dir.display());
    Ok(Some(guard))
}

/// Delete log files in `log_dir` older than `max_age_days`. Returns how many
/// were removed. A missing directory is not an error.
pub fn cleanup_old_logs(log_dir: &Path, max_age_days: u64) -> io::Result<usize> {
    let entries = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let max_age = Duration::from_secs(max_age_days * 24 * 60 * 60);
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        let is_log = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with(LOG_FILE_PREFIX));
        if !is_log {
            continue;
        }

        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if now.duration_since(modified).unwrap_or_default() > max_age
            && std::fs::remove_file(&path).is_ok()
        {
            removed += 1;
        }
    }

    Ok(removed)
}
