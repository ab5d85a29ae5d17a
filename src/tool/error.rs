//! Error types for the tool lifecycle

use super::state::{ExitStatus, LifecycleState};
use crate::cli::CliError;
use crate::component::TraitError;
use thiserror::Error;

/// Result type for lifecycle operations
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors surfaced by [`ToolRunner`](super::ToolRunner)
#[derive(Error, Debug)]
pub enum ToolError {
    /// A lifecycle method was called from a state that does not allow it
    #[error("cannot {operation} a tool in state {state}")]
    IllegalState {
        /// Rejected operation
        operation: &'static str,
        /// State at the time of the call
        state: LifecycleState,
    },

    /// Command-line arguments could not be parsed
    #[error(transparent)]
    Argument(#[from] CliError),

    /// Configuration, component construction or the `setup` hook failed
    #[error("setup failed: {0:#}")]
    Setup(#[source] anyhow::Error),

    /// The `start` hook failed
    #[error("runtime error: {0:#}")]
    Runtime(#[source] anyhow::Error),

    /// A programmatic assignment was rejected
    #[error(transparent)]
    Trait(#[from] TraitError),
}

impl ToolError {
    /// Process exit status for this error.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            ToolError::Argument(CliError::InvalidAlias { .. } | CliError::DuplicateClass { .. }) => {
                ExitStatus::SetupError
            }
            ToolError::Argument(_) => ExitStatus::UnrecognizedArgument,
            ToolError::Setup(_) => ExitStatus::SetupError,
            ToolError::Runtime(_) | ToolError::IllegalState { .. } | ToolError::Trait(_) => {
                ExitStatus::RuntimeError
            }
        }
    }
}
