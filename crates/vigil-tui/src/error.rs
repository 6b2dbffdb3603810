use std::fmt;

/// Result type for vigil-tui operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the interface layer
#[derive(Debug)]
pub enum Error {
    /// Page index outside [0, page count)
    InvalidPage { page: usize, count: usize },

    /// Terminal IO failed
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPage { page, count } => {
                write!(f, "Invalid page number: {} (interface has {} pages)", page, count)
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::InvalidPage { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
