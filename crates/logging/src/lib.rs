// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! Logging setup shared by every kadmesh binary. Initializes a `tracing`
//! subscriber filtered by the `KADMESH_LOG` environment variable (falling
//! back to a caller-supplied default), writing either to stdout or to a
//! rotating log directory.

mod appender;
pub mod error;

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use crate::error::{LoggingError, Result};

/// Where log lines go.
pub enum LogOutput {
    Stdout,
    /// A directory to rotate log files under. The directory is created if
    /// it does not already exist.
    Directory(PathBuf),
}

/// Logging configuration a binary hands to [`init_logging`].
pub struct LoggingConfig {
    pub output: LogOutput,
    /// Used when `KADMESH_LOG` is unset, e.g. `"kadmesh_networking=debug,info"`.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            output: LogOutput::Stdout,
            default_filter: "info".to_string(),
        }
    }
}

/// Initialize the global `tracing` subscriber. Must be called at most once
/// per process; a second call returns [`LoggingError::AlreadyInitialized`].
///
/// When logging to a directory, the returned [`WorkerGuard`] must be held
/// for the remainder of the program's life — dropping it flushes and stops
/// the non-blocking writer, silently truncating any log output after that.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env("KADMESH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter.clone()));

    match config.output {
        LogOutput::Stdout => {
            let subscriber = tfmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_ansi(atty_stdout())
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|_| LoggingError::AlreadyInitialized)?;
            Ok(None)
        }
        LogOutput::Directory(dir) => {
            std::fs::create_dir_all(&dir)?;
            let (writer, guard) = appender::file_rotater(&dir);
            let subscriber = tfmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|_| LoggingError::AlreadyInitialized)?;
            Ok(Some(guard))
        }
    }
}

/// Best-effort terminal detection: colorize stdout only when it looks like
/// an interactive terminal rather than a redirected file or pipe.
fn atty_stdout() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}

/// Initialize a bare stdout subscriber for tests, idempotent across
/// repeated calls within one process (later calls are a silent no-op).
pub fn init_test_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = fmt().with_test_writer().with_env_filter(EnvFilter::new("debug")).try_init();
    });
}

fn fmt() -> tfmt::SubscriberBuilder {
    tfmt::Subscriber::builder()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_stdout_at_info() {
        let config = LoggingConfig::default();
        assert!(matches!(config.output, LogOutput::Stdout));
        assert_eq!(config.default_filter, "info");
    }
}
