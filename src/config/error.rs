//! Error types for configuration files

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid for its format or has the wrong shape
    #[error("failed to parse config file {}: {reason}", path.display())]
    ConfigParse {
        /// File being parsed
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// The path does not resolve to a file
    #[error("config file not found: {}", path.display())]
    ConfigFileNotFound {
        /// Missing path
        path: PathBuf,
    },

    /// The file exists but could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a parse error with context
    pub fn parse<S: Into<String>>(path: impl Into<PathBuf>, reason: S) -> Self {
        Self::ConfigParse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
