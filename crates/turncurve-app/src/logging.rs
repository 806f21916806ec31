use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Keeps the non-blocking writer alive for the process lifetime.
pub struct LoggingGuard {
    _guard: Option<WorkerGuard>,
    pub structured_path: Option<PathBuf>,
}

/// Install the global subscriber: structured JSON to a file under `log_dir`
/// when enabled, compact stderr output otherwise. `RUST_LOG` wins over the
/// configured level either way.
pub fn init_logging(logging: &LoggingConfig, log_dir: &Path) -> Result<LoggingGuard> {
    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if !logging.enable_structured {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .finish();
        // Ignore error if a global subscriber is already set (e.g., when running in tests)
        let _ = tracing::subscriber::set_global_default(subscriber);
        return Ok(LoggingGuard {
            _guard: None,
            structured_path: None,
        });
    }

    fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory at {}", log_dir.display()))?;

    let structured_path = log_dir.join("viewer.jsonl");
    let file = File::create(&structured_path)
        .with_context(|| format!("creating log file at {}", structured_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(LoggingGuard {
        _guard: Some(guard),
        structured_path: Some(structured_path),
    })
}
