use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_DIR: &str = "./logs";
pub const LOG_FILE_PREFIX: &str = "nse-bias-report.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging to both console and file.
/// Log files are created in ./logs with daily rotation; RUST_LOG overrides the `info` default.
pub fn init_logging() -> Result<()> {
    init_logging_in(Path::new(LOG_DIR))
}

/// Console + daily JSON file logging under `dir`.
/// Nothing is installed when the directory cannot be created.
pub fn init_logging_in(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);

    tracing_subscriber::registry()
        .with(
            // Console output
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_ansi(true),
        )
        .with(
            // File output with JSON formatting
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_target(true)
                .with_line_number(true)
                .with_ansi(false)
                .json(),
        )
        .with(env_filter())
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Console-only fallback. Returns false if a subscriber is already installed.
pub fn init_console_logging() -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_ansi(true),
        )
        .with(env_filter())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{error, info, warn};

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("nse-bias-report-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_logging() {
        let dir = scratch_dir("logs");
        init_logging_in(&dir).unwrap();

        info!("This is an info message");
        warn!("This is a warning message");
        error!("This is an error message");

        assert!(dir.exists());
        // Global subscriber already set, fallback declines quietly
        assert!(!init_console_logging());
    }

    #[test]
    fn test_unwritable_log_dir_is_an_error() {
        // A regular file where the directory's parent should be
        let blocker = scratch_dir("blocker");
        std::fs::write(&blocker, b"not a dir").unwrap();

        assert!(init_logging_in(&blocker.join("logs")).is_err());
    }
}
