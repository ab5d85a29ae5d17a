//! Typed, validated, observable component attributes.
//!
//! A [`ComponentClass`] is a static table of [`AttributeDescriptor`]s. A
//! [`Component`] holds one current value per descriptor and exposes a single
//! [`Component::set`] entry point that validates, commits, and then notifies
//! observers.
//!
//! # Example
//!
//! ```
//! use ctk::component::{AttrType, AttributeDescriptor, Component, ComponentClass};
//! use std::sync::Arc;
//!
//! let class = ComponentClass::new("Cleaner")
//!     .with_attribute(
//!         AttributeDescriptor::new("threshold", AttrType::Float, 5.0)
//!             .help("Picture threshold"),
//!     )
//!     .unwrap();
//!
//! let mut cleaner = Component::new(Arc::new(class));
//! cleaner
//!     .observe("threshold", |change| {
//!         println!("{} -> {}", change.old, change.new);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! cleaner.set("threshold", "7.5").unwrap();
//! assert_eq!(cleaner.get_f64("threshold"), Some(7.5));
//! assert!(cleaner.set("threshold", true).is_err());
//! ```

#[allow(clippy::module_inception)]
pub mod component;
pub mod descriptor;
pub mod error;
pub mod scope;
pub mod value;

// Re-export main types for convenience
pub use self::component::{Change, Component, Observer};
pub use self::descriptor::{AttributeDescriptor, ComponentClass};
pub use self::error::{TraitError, TraitResult};
pub use self::scope::ToolScope;
pub use self::value::{AttrType, Value};
