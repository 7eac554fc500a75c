//! Tracing subscriber bootstrap.
//!
//! Log lines pass through [`SanitizingMakeWriter`] so patient identifiers
//! never reach the sink.
//!
//! Environment:
//! - `RUST_LOG`: filter directives (default `info`)
//! - `NUTRIGUARD_LOG_MODE`: `stdout` (default) or `file`
//! - `NUTRIGUARD_LOG_FILE`: target path in file mode (default `nutriguard.log`)

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::sanitize::SanitizingMakeWriter;
use crate::{NutriguardError, Result};

const DEFAULT_LOG_FILE: &str = "nutriguard.log";

/// Where formatted logs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    File(std::path::PathBuf),
}

impl LogTarget {
    /// Resolve the target from `NUTRIGUARD_LOG_MODE` / `NUTRIGUARD_LOG_FILE`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("NUTRIGUARD_LOG_MODE").ok().as_deref(),
            std::env::var("NUTRIGUARD_LOG_FILE").ok(),
        )
    }

    fn from_vars(mode: Option<&str>, file: Option<String>) -> Self {
        match mode {
            Some("file") => Self::File(file.unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()).into()),
            _ => Self::Stdout,
        }
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the lifetime of the process; dropping it
/// flushes and stops the background writer.
///
/// # Errors
/// Returns error if the log file cannot be opened or a global subscriber is
/// already installed.
pub fn init_logging() -> Result<WorkerGuard> {
    let (writer, guard) = match LogTarget::from_env() {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                // Best-effort: a missing directory surfaces as the open error below.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            tracing_appender::non_blocking(file)
        }
        LogTarget::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .try_init()
        .map_err(|e| NutriguardError::Logging(e.to_string()))?;

    tracing::info!("Logging initialized");
    Ok(guard)
}
