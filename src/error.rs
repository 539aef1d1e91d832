//! Error types and Result alias for ttyshell

use std::fmt;

use crate::config::ConfigError;
use crate::fs::FsError;
use crate::security::SecurityError;
use crate::shell::{PathError, ShellError};

/// Result type alias for ttyshell operations
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error for the public façade
#[derive(Debug)]
pub enum Error {
    /// Configuration loading or validation failed
    Config(ConfigError),

    /// Credential authority rejected an operation
    Security(SecurityError),

    /// Namespace operation failed
    Fs(FsError),

    /// Path canonicalization failed
    Path(PathError),

    /// Command execution failed
    Shell(ShellError),

    /// Generic errors (for cases not yet categorized)
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(err) => write!(f, "Configuration error: {}", err),
            Error::Security(err) => write!(f, "Security error: {}", err),
            Error::Fs(err) => write!(f, "Namespace error: {}", err),
            Error::Path(err) => write!(f, "Path error: {}", err),
            Error::Shell(err) => write!(f, "Shell error: {}", err),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<SecurityError> for Error {
    fn from(err: SecurityError) -> Self {
        Error::Security(err)
    }
}

impl From<FsError> for Error {
    fn from(err: FsError) -> Self {
        Error::Fs(err)
    }
}

impl From<PathError> for Error {
    fn from(err: PathError) -> Self {
        Error::Path(err)
    }
}

impl From<ShellError> for Error {
    fn from(err: ShellError) -> Self {
        Error::Shell(err)
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
