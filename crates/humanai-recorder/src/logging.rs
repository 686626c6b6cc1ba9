//! Tracing setup: stderr plus a daily rolling log file.

use crate::{AppError, AppResult, config::Config};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use error_location::ErrorLocation;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_BASENAME: &str = "humanai-recorder.log";
const LOG_DIR_ENV: &str = "HUMANAI_RECORDER_LOG_PATH";
const LOG_RETENTION_DAYS: u64 = 7;
const DEFAULT_FILTER: &str = "humanai_recorder=debug,humanai_recorder_core=debug";

/// Install the global subscriber.
///
/// Logs always go to stderr. When the log directory is usable they also go
/// to a daily rolling file; keep the returned guard alive until exit so the
/// file writer flushes.
pub(crate) fn init_logging() -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match prepare_log_dir() {
        Ok(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_BASENAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();

            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .init();

            warn!(error = %e, "File logging disabled");

            None
        }
    }
}

fn prepare_log_dir() -> AppResult<PathBuf> {
    let log_dir = resolve_log_dir()?;
    fs::create_dir_all(&log_dir).map_err(|e| AppError::ConfigError {
        reason: format!("Failed to create log directory {:?}: {}", log_dir, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    prune_old_logs(
        &log_dir,
        Duration::from_secs(60 * 60 * 24 * LOG_RETENTION_DAYS),
    );

    Ok(log_dir)
}

fn resolve_log_dir() -> AppResult<PathBuf> {
    if let Ok(override_path) = std::env::var(LOG_DIR_ENV) {
        return Ok(PathBuf::from(override_path));
    }

    let proj_dirs = Config::project_dirs()?;
    let base = proj_dirs
        .state_dir()
        .unwrap_or_else(|| proj_dirs.data_local_dir());

    Ok(base.join("logs"))
}

/// Delete rotated log files older than `max_age`.
pub(crate) fn prune_old_logs(log_dir: &Path, max_age: Duration) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_log = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_BASENAME));
        if !is_log {
            continue;
        }

        let modified = entry.metadata().and_then(|m| m.modified());
        if let Ok(modified) = modified
            && modified < cutoff
        {
            let _ = fs::remove_file(&path);
        }
    }
}
