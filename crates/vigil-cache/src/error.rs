use std::fmt;

/// Result type for vigil-cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the cache layer
#[derive(Debug)]
pub enum Error {
    /// Database operation failed
    Database(rusqlite::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Fingerprint isn't forty hex digits
    InvalidFingerprint(String),

    /// Nickname is empty, too long, or has characters outside [A-Za-z0-9]
    InvalidNickname(String),

    /// Address is neither an IPv4 nor an IPv6 literal
    InvalidAddress(String),

    /// Port is outside 1-65535
    InvalidPort(u16),
}

impl Error {
    /// Name of the record field that failed validation, if this is a
    /// validation error.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::InvalidFingerprint(_) => Some("fingerprint"),
            Error::InvalidNickname(_) => Some("nickname"),
            Error::InvalidAddress(_) => Some("address"),
            Error::InvalidPort(_) => Some("port"),
            Error::Database(_) | Error::Io(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database(err) => write!(f, "Database error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::InvalidFingerprint(value) => {
                write!(f, "'{}' isn't a valid fingerprint", value)
            }
            Error::InvalidNickname(value) => write!(f, "'{}' isn't a valid nickname", value),
            Error::InvalidAddress(value) => write!(f, "'{}' isn't a valid address", value),
            Error::InvalidPort(value) => write!(f, "'{}' isn't a valid port", value),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
