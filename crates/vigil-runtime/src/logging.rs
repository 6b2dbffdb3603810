//! Log output for dashboards. The terminal belongs to the interface, so
//! events go to a file instead.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

/// Builds the event filter. `RUST_LOG` wins over the configured level.
pub fn filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(level)
        .map_err(|err| Error::Config(format!("invalid log level '{}': {}", level, err)))
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Installs the global subscriber, appending to the log at `path`. Fails if
/// a subscriber is already installed.
pub fn init(path: &Path, level: &str) -> Result<()> {
    let filter = filter(level)?;
    let file = open_log(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|err| Error::Setup(err.to_string()))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_level_is_rejected() {
        // skipped when the environment picks the filter
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }

        let err = filter("[not a filter").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_open_log_creates_parents() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("logs").join("vigil.log");

        open_log(&path)?;
        assert!(path.exists());

        Ok(())
    }
}
