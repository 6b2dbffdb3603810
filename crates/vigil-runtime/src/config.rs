use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use vigil_tui::InterfaceSettings;

/// Value of `data_directory` that turns off everything we'd write to disk.
pub const DISABLED: &str = "disabled";

/// Resolve the workspace directory (where config.toml lives) based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. VIGIL_HOME environment variable (with tilde expansion)
/// 3. XDG data directory
/// 4. ~/.vigil (fallback for systems without XDG)
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("VIGIL_HOME") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("vigil"));
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".vigil"));
    }

    Err(Error::Config(
        "Could not determine workspace path: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }

    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }

    PathBuf::from(path)
}

fn default_redraw_rate() -> u64 {
    5
}

fn default_confirm_quit() -> bool {
    true
}

fn default_data_directory() -> String {
    "~/.vigil".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between redraws when nothing else happens.
    #[serde(default = "default_redraw_rate")]
    pub redraw_rate: u64,

    #[serde(default = "default_confirm_quit")]
    pub confirm_quit: bool,

    /// Where the cache and log go, or "disabled".
    #[serde(default = "default_data_directory")]
    pub data_directory: String,

    /// Filter used when RUST_LOG isn't set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redraw_rate: default_redraw_rate(),
            confirm_quit: default_confirm_quit(),
            data_directory: default_data_directory(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        // anything faster than once a second is just busy looping
        config.redraw_rate = config.redraw_rate.max(1);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_workspace_path(None)?.join("config.toml"))
    }

    pub fn interface_settings(&self) -> InterfaceSettings {
        InterfaceSettings {
            redraw_rate: Duration::from_secs(self.redraw_rate.max(1)),
            confirm_quit: self.confirm_quit,
        }
    }

    pub fn is_data_directory_disabled(&self) -> bool {
        self.data_directory == DISABLED
    }

    /// Path for a file in our data directory, creating the directory if
    /// needed. `None` if the directory is disabled or can't be created, in
    /// which case callers should get by without persisting anything.
    pub fn data_path(&self, filename: &str) -> Option<PathBuf> {
        if self.is_data_directory_disabled() {
            return None;
        }

        let data_dir = expand_tilde(&self.data_directory);

        if let Err(err) = std::fs::create_dir_all(&data_dir) {
            warn!(
                "Unable to create a data directory at {} ({}). This is fine, but caching is disabled.",
                data_dir.display(),
                err
            );
            return None;
        }

        Some(data_dir.join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.redraw_rate, 5);
        assert!(config.confirm_quit);
        assert_eq!(config.data_directory, "~/.vigil");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            redraw_rate: 2,
            confirm_quit: false,
            data_directory: "/var/lib/vigil".to_string(),
            log_level: "debug".to_string(),
        };

        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path)?;
        assert_eq!(config, Config::default());

        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "confirm_quit = false\n")?;

        let config = Config::load_from(&config_path)?;
        assert!(!config.confirm_quit);
        assert_eq!(config.redraw_rate, 5);
        assert_eq!(config.log_level, "info");

        Ok(())
    }

    #[test]
    fn test_redraw_rate_has_a_floor() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "redraw_rate = 0\n")?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.redraw_rate, 1);
        assert_eq!(config.interface_settings().redraw_rate, Duration::from_secs(1));

        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_config_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "redraw_rate = \"soon\"\n")?;

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        Ok(())
    }

    #[test]
    fn test_data_path_creates_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let data_dir = temp_dir.path().join("data");

        let config = Config {
            data_directory: data_dir.to_string_lossy().into_owned(),
            ..Config::default()
        };

        let path = config.data_path("cache.sqlite");
        assert_eq!(path, Some(data_dir.join("cache.sqlite")));
        assert!(data_dir.is_dir());

        Ok(())
    }

    #[test]
    fn test_data_path_disabled() {
        let config = Config {
            data_directory: DISABLED.to_string(),
            ..Config::default()
        };

        assert!(config.is_data_directory_disabled());
        assert_eq!(config.data_path("cache.sqlite"), None);
    }

    #[test]
    fn test_data_path_unusable_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, "not a directory")?;

        let config = Config {
            data_directory: blocker.join("data").to_string_lossy().into_owned(),
            ..Config::default()
        };

        assert_eq!(config.data_path("cache.sqlite"), None);
        Ok(())
    }

    #[test]
    fn test_resolve_explicit_path() -> Result<()> {
        let path = resolve_workspace_path(Some("/tmp/vigil-test"))?;
        assert_eq!(path, PathBuf::from("/tmp/vigil-test"));
        Ok(())
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/x/y"), home.join("x/y"));
            assert_eq!(expand_tilde("~"), home);
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("rel/~/path"), PathBuf::from("rel/~/path"));
    }
}
