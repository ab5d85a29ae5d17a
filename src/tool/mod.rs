//! Tool lifecycle: a root component with a command-line driven run.
//!
//! A [`Tool`] declares its own attribute class, the component classes it
//! configures and an alias table. [`ToolRunner`] parses the command line,
//! merges defaults, the optional config file, command-line values and queued
//! programmatic assignments, constructs the components and then drives the
//! `setup`, `start` and `finish` hooks.
//!
//! | Outcome                          | Exit code |
//! |----------------------------------|-----------|
//! | success, `--help`, `--version`   | 0         |
//! | error in `start`                 | 1         |
//! | config or setup error            | 2         |
//! | unrecognized or invalid argument | 3         |

pub mod context;
pub mod error;
pub mod runner;
pub mod state;
pub mod traits;

pub use context::ToolContext;
pub use error::{ToolError, ToolResult};
pub use runner::{Initialization, ToolRunner};
pub use state::{ExitStatus, LifecycleState};
pub use traits::Tool;
