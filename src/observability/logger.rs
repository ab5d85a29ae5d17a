//! Logging system for tools and components.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Default line pattern.
pub const DEFAULT_LOG_FORMAT: &str = "{level} [{name}]: {message}";

/// Severity levels, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Diagnostic detail
    Debug,
    /// Progress information
    Info,
    /// Something unexpected that does not stop the tool
    #[default]
    Warning,
    /// An operation failed
    Error,
    /// The tool cannot continue
    Critical,
}

impl LogLevel {
    /// Accepted level names, in severity order.
    pub const NAMES: [&'static str; 5] = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

    /// Upper-case level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a level name is not one of [`LogLevel::NAMES`].
#[derive(Debug, Error)]
#[error("unknown log level `{0}` (expected one of DEBUG, INFO, WARNING, ERROR, CRITICAL)")]
pub struct UnknownLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(UnknownLogLevel(s.to_string())),
        }
    }
}

/// Logger for tool and component diagnostics.
///
/// Lines at or above the configured level go to stderr and, when a log file
/// is configured, are appended to it as well. Each component gets its own
/// named copy through [`Logger::named`].
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    level: LogLevel,
    format: String,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Initialize logger.
    ///
    /// # Arguments
    /// * `log_file` - Optional file to append diagnostics to.
    /// * `log_level` - Level name (defaults to "WARNING").
    pub fn new(log_file: Option<&Path>, log_level: Option<&str>) -> Result<Self> {
        let level = match log_level {
            Some(name) => name.parse::<LogLevel>()?,
            None => LogLevel::default(),
        };

        let logger = Self {
            name: "ctk".to_string(),
            level,
            format: DEFAULT_LOG_FORMAT.to_string(),
            log_file: log_file.map(Path::to_path_buf),
        };

        if let Some(path) = &logger.log_file {
            // Ensure log directory exists
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory: {}", parent.display())
                })?;
            }
            if !path.exists() {
                logger.initialize_log_file(path)?;
            }
        }

        Ok(logger)
    }

    /// Replace the line pattern.
    ///
    /// Supported placeholders: `{time}`, `{level}`, `{name}`, `{message}`.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Replace the level threshold.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Copy of this logger reporting under a different name.
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Initialize the log file with header.
    fn initialize_log_file(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;

        let now: DateTime<Utc> = Utc::now();

        writeln!(file, "# Tool Log\n")?;
        writeln!(file, "Log started: {}\n", now.to_rfc3339())?;

        Ok(())
    }

    /// Append content to log file.
    fn append_to_log(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        writeln!(file, "{}", content).with_context(|| "Failed to write to log file")?;

        Ok(())
    }

    /// Render one line with the configured pattern.
    pub fn render(&self, level: LogLevel, message: &str) -> String {
        let now: DateTime<Utc> = Utc::now();
        self.format
            .replace("{time}", &now.to_rfc3339())
            .replace("{level}", level.as_str())
            .replace("{name}", &self.name)
            .replace("{message}", message)
    }

    /// Whether lines at `level` are emitted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    /// Emit a line at `level`.
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }

        let line = self.render(level, message);
        eprintln!("{}", line);

        if let Some(path) = &self.log_file {
            if let Err(e) = self.append_to_log(path, &line) {
                eprintln!("WARNING: {:#}", e);
            }
        }
    }

    /// Log debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log warning message.
    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    /// Log error message.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Log critical message.
    pub fn critical(&self, message: &str) {
        self.log(LogLevel::Critical, message);
    }

    /// Logger name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the log level.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Line pattern
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Get the log file path.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            name: "ctk".to_string(),
            level: LogLevel::default(),
            format: DEFAULT_LOG_FORMAT.to_string(),
            log_file: None,
        }
    }
}
