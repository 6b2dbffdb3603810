use std::fmt;

/// Result type for vigil-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while setting up or running a dashboard
#[derive(Debug)]
pub enum Error {
    /// Cache layer error
    Cache(vigil_cache::Error),

    /// Interface layer error
    Interface(vigil_tui::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Logging or signal handling couldn't be installed
    Setup(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Cache(err) => write!(f, "Cache error: {}", err),
            Error::Interface(err) => write!(f, "Interface error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Setup(msg) => write!(f, "Setup error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Cache(err) => Some(err),
            Error::Interface(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_) | Error::Setup(_) => None,
        }
    }
}

impl From<vigil_cache::Error> for Error {
    fn from(err: vigil_cache::Error) -> Self {
        Error::Cache(err)
    }
}

impl From<vigil_tui::Error> for Error {
    fn from(err: vigil_tui::Error) -> Self {
        Error::Interface(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<ctrlc::Error> for Error {
    fn from(err: ctrlc::Error) -> Self {
        Error::Setup(err.to_string())
    }
}
