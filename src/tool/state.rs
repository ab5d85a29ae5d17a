//! Lifecycle states and exit statuses.

use std::fmt;

/// Tool lifecycle state.
///
/// `Created -> Initialized -> Running -> Finished`, with `Failed` reachable
/// from any step that can error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// Constructed, nothing parsed yet
    #[default]
    Created,
    /// Configured and set up, ready to start
    Initialized,
    /// Inside the `start` hook
    Running,
    /// Completed normally (or a usage request was served)
    Finished,
    /// Setup or start failed
    Failed,
}

impl LifecycleState {
    /// Lower-case state name
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Created => "created",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Running => "running",
            LifecycleState::Finished => "finished",
            LifecycleState::Failed => "failed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process exit status of a tool run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStatus {
    /// Normal completion, help or version output
    Success,
    /// The `start` hook failed
    RuntimeError,
    /// Configuration, component construction or `setup` failed
    SetupError,
    /// The command line could not be parsed
    UnrecognizedArgument,
}

impl ExitStatus {
    /// Numeric process exit code
    pub fn code(&self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::RuntimeError => 1,
            ExitStatus::SetupError => 2,
            ExitStatus::UnrecognizedArgument => 3,
        }
    }

    /// Whether this is [`ExitStatus::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}
