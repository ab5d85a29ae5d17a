//! CLI feature - command-line configuration for tools
//!
//! The argument vocabulary is generated at runtime from the registered
//! component classes: every configurable attribute becomes a
//! `--Class.attribute VALUE` flag and an [`AliasTable`] adds short names for
//! the commonly used ones.
//!
//! # Example
//!
//! ```rust
//! use ctk::cli::{AliasTable, ArgumentParser, ParseOutcome};
//! use ctk::component::{AttrType, AttributeDescriptor, ComponentClass, Value};
//! use std::sync::Arc;
//!
//! let class = ComponentClass::new("MyTool")
//!     .with_attribute(AttributeDescriptor::new("iterations", AttrType::Integer, 5))
//!     .unwrap();
//! let aliases = AliasTable::new().add("iterations", "MyTool.iterations");
//! let parser = ArgumentParser::new("mytool", &[Arc::new(class)], &aliases).unwrap();
//!
//! let ParseOutcome::Configure(parsed) = parser.parse(["--iterations", "3"]).unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(parsed.fragment.get("MyTool", "iterations"), Some(&Value::from("3")));
//! ```

pub mod aliases;
pub mod builder;
pub mod error;
pub mod parser;
pub mod utils;

// Re-exports for convenience
pub use aliases::{AliasTable, AttributePath};
pub use builder::{CliBuilder, CONTROL_FLAGS};
pub use error::{CliError, CliResult};
pub use parser::{ArgumentParser, ParseOutcome, ParsedArgs, UsageRequest};
pub use utils::*;
