//! Component Tool Kit (ctk) - configurable components and command-line tools
//!
//! ctk provides the pieces for building small command-line tools out of
//! named, independently configurable components:
//!
//! - **`component`** - typed attribute descriptors, components and observers
//! - **`config`** - config files and the precedence-merged configuration store
//! - **`observability`** - levelled, per-component diagnostic logging
//! - **`cli`** - command-line parsing generated from the registered classes
//! - **`tool`** - the tool trait and its lifecycle runner
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! ctk = "0.1"
//! # YAML config files:
//! ctk = { version = "0.1", features = ["yaml"] }
//! # Or enable everything:
//! ctk = { version = "0.1", features = ["all"] }
//! ```
//!
//! # Configuration precedence
//!
//! Declared defaults < config file (`--config`) < command line
//! (`--Class.attribute` or an alias) < programmatic assignment.
//!
//! # Example
//!
//! ```ignore
//! use ctk::prelude::*;
//!
//! struct MyTool;
//!
//! impl Tool for MyTool {
//!     fn name(&self) -> &str { "mytool" }
//!     fn class(&self) -> Arc<ComponentClass> { /* ... */ }
//!     fn start(&mut self, ctx: &mut ToolContext) -> anyhow::Result<()> { Ok(()) }
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     ToolRunner::new(MyTool).run_from_env().into()
//! }
//! ```

#![warn(missing_docs)]

/// Attribute descriptors, components and observers
pub mod component;

/// Config file loading and the configuration store
pub mod config;

/// Diagnostic logging
pub mod observability;

/// Command-line parsing (enabled with the `cli` feature)
#[cfg(feature = "cli")]
pub mod cli;

/// Tool trait and lifecycle runner (enabled with the `cli` feature)
#[cfg(feature = "cli")]
pub mod tool;

/// Commonly used types
pub mod prelude {
    pub use crate::component::{
        AttrType, AttributeDescriptor, Change, Component, ComponentClass, TraitError, Value,
    };
    pub use crate::config::{ConfigFileLoader, ConfigStore, Fragment, Precedence, Source};
    pub use crate::observability::{LogLevel, Logger};
    pub use std::sync::Arc;

    #[cfg(feature = "cli")]
    pub use crate::cli::{AliasTable, ArgumentParser, ParseOutcome};
    #[cfg(feature = "cli")]
    pub use crate::tool::{ExitStatus, LifecycleState, Tool, ToolContext, ToolError, ToolRunner};
}
