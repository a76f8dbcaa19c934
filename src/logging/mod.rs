// Logging module - tracing subscriber setup
//
// Stdout always gets human-readable output. When file logging is enabled a
// second layer writes JSON lines through a non-blocking rolling appender.
//
// Precedence for the filter: RUST_LOG env var > config file > default "info"

use crate::config::{LoggingConfig, Rotation};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log files are named `gallery.<period>`
const LOG_FILE_PREFIX: &str = "gallery";

/// Build the default filter directive for a configured level
fn default_directive(level: &str) -> String {
    format!("gallery={},tower_http=info,axum=info", level)
}

fn appender_rotation(rotation: Rotation) -> rolling::Rotation {
    match rotation {
        Rotation::Hourly => rolling::Rotation::HOURLY,
        Rotation::Daily => rolling::Rotation::DAILY,
        Rotation::Never => rolling::Rotation::NEVER,
    }
}

/// Open the rolling appender, creating `dir` first
fn file_appender(dir: &Path, rotation: Rotation) -> std::io::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    Ok(RollingFileAppender::new(
        appender_rotation(rotation),
        dir,
        LOG_FILE_PREFIX,
    ))
}

/// Install the global subscriber.
///
/// The returned guard must be kept alive for the duration of the program so
/// buffered file logs are flushed on exit.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(&config.level).into());

    let appender = config.dir.as_deref().and_then(|dir| {
        file_appender(dir, config.rotation)
            .map_err(|e| {
                eprintln!("Warning: Could not create log directory {:?}: {}", dir, e);
            })
            .ok()
    });

    let Some(appender) = appender else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
        return None;
    };

    // Writes happen on a background thread
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}
