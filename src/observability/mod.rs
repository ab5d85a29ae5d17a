//! Observability utilities for tools and components.
//!
//! This module provides a levelled, pattern-formatted logger that writes to
//! stderr and optionally to a log file.
//!
//! # Example
//!
//! ```no_run
//! use ctk::observability::{Logger, LogLevel};
//!
//! let logger = Logger::new(None, Some("INFO"))
//!     .unwrap()
//!     .with_format("{time} {level} [{name}] {message}")
//!     .named("MyTool");
//!
//! logger.info("Starting");
//! assert!(logger.enabled(LogLevel::Warning));
//! ```

pub mod logger;

// Re-export main types for convenience
pub use logger::{LogLevel, Logger, UnknownLogLevel, DEFAULT_LOG_FORMAT};
