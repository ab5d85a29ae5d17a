//! Error types for command-line parsing

use clap::error::{ContextKind, ErrorKind};
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur while turning argv into configuration
#[derive(Error, Debug)]
pub enum CliError {
    /// A token that is neither a control flag, an alias, nor a declared
    /// configurable `Class.attribute`
    #[error("unrecognized argument: {token}")]
    UnrecognizedArgument {
        /// Offending token
        token: String,
    },

    /// A recognized flag with a missing or invalid value
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Parser message
        message: String,
    },

    /// Two registered classes share a name
    #[error("component class {class} is registered twice")]
    DuplicateClass {
        /// Repeated class name
        class: String,
    },

    /// An alias table entry that cannot be resolved
    #[error("invalid alias `--{alias}`: {reason}")]
    InvalidAlias {
        /// Alias name
        alias: String,
        /// Why it was rejected
        reason: String,
    },
}

impl CliError {
    /// Classify a clap parse failure.
    pub fn from_clap(err: clap::Error) -> Self {
        match err.kind() {
            ErrorKind::UnknownArgument => {
                let token = err
                    .get(ContextKind::InvalidArg)
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| err.to_string().trim().to_string());
                Self::UnrecognizedArgument { token }
            }
            _ => Self::InvalidArgument {
                message: err.to_string().trim().to_string(),
            },
        }
    }

    /// Create an alias error with context
    pub fn alias<S: Into<String>>(alias: &str, reason: S) -> Self {
        Self::InvalidAlias {
            alias: alias.to_string(),
            reason: reason.into(),
        }
    }
}
