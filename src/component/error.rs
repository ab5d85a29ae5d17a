//! Error types for attribute declaration and assignment

use super::value::{AttrType, Value};
use thiserror::Error;

/// Result type for attribute operations
pub type TraitResult<T> = Result<T, TraitError>;

/// Errors raised while declaring, validating or assigning attributes
#[derive(Error, Debug)]
pub enum TraitError {
    /// An attribute with the same name is already declared on the class
    #[error("attribute `{attribute}` is already declared on {class}")]
    DuplicateAttribute {
        /// Owning class
        class: String,
        /// Attribute name
        attribute: String,
    },

    /// A value does not satisfy the attribute's declared type
    #[error("attribute `{attribute}` expects {expected}, got {given}")]
    TypeMismatch {
        /// Attribute name
        attribute: String,
        /// Declared type
        expected: AttrType,
        /// Rejected value
        given: Value,
    },

    /// The attribute is not declared on the class
    #[error("{class} has no attribute `{attribute}`")]
    UnknownAttribute {
        /// Owning class
        class: String,
        /// Attribute name
        attribute: String,
    },

    /// An observer failed after the new value was committed
    #[error("observer of `{attribute}` failed: {source:#}")]
    Observer {
        /// Attribute whose observer failed
        attribute: String,
        /// Error returned by the observer
        #[source]
        source: anyhow::Error,
    },
}
