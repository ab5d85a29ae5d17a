//! Configuration management for components and tools.
//!
//! This module provides the precedence-ordered [`ConfigStore`] and the
//! [`ConfigFileLoader`] that turns TOML/JSON (and YAML with the `yaml`
//! feature) documents into configuration fragments.
//!
//! # Example
//!
//! ```no_run
//! use ctk::component::{AttrType, AttributeDescriptor, ComponentClass};
//! use ctk::config::{ConfigFileLoader, ConfigStore};
//! use std::sync::Arc;
//!
//! let class = ComponentClass::new("MyTool")
//!     .with_attribute(AttributeDescriptor::new("iterations", AttrType::Integer, 5))
//!     .unwrap();
//!
//! let mut store = ConfigStore::from_defaults(&[Arc::new(class)]);
//! store.merge(&ConfigFileLoader::load("config/tool.toml").unwrap());
//!
//! println!("iterations: {:?}", store.get("MyTool", "iterations"));
//! ```

pub mod error;
pub mod loader;
pub mod store;

// Re-export main types for convenience
pub use self::error::{ConfigError, ConfigResult};
pub use self::loader::{ConfigFileLoader, ConfigFormat};
pub use self::store::{
    ConfigStore, Fragment, KeyIssue, Precedence, Sections, Source, UnrecognizedKey,
};
