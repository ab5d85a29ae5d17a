//! Structured config file ingestion.
//!
//! Top-level keys are class names, nested keys are attribute names. Values
//! are kept raw; attribute descriptors validate them when components are
//! constructed.

use super::error::{ConfigError, ConfigResult};
use super::store::{Fragment, Sections, Source};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML document
    Toml,
    /// JSON document
    Json,
    /// YAML document (requires the `yaml` feature)
    #[cfg(feature = "yaml")]
    Yaml,
}

impl ConfigFormat {
    /// Format implied by a file extension, if recognized.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Some(ConfigFormat::Toml),
            Some("json") => Some(ConfigFormat::Json),
            #[cfg(feature = "yaml")]
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }

    /// Parse `content` into nested sections.
    pub fn parse(&self, content: &str) -> Result<Sections, String> {
        match self {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            #[cfg(feature = "yaml")]
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Loads config files into file-precedence fragments.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigFileLoader;

impl ConfigFileLoader {
    /// Load a config file, detecting the format from its extension.
    ///
    /// Unknown extensions are tried as TOML, then JSON (then YAML when
    /// enabled); the first parser's message is reported if all fail.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Fragment> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::ConfigFileNotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let source = Source::File(path.to_path_buf());
        if content.trim().is_empty() {
            return Ok(Fragment::new(source));
        }

        let sections = match ConfigFormat::from_path(path) {
            Some(format) => format.parse(&content),
            None => Self::parse_any(&content),
        }
        .map_err(|reason| ConfigError::parse(path, reason))?;

        Ok(Fragment::from_sections(source, sections))
    }

    fn parse_any(content: &str) -> Result<Sections, String> {
        let first = match ConfigFormat::Toml.parse(content) {
            Ok(sections) => return Ok(sections),
            Err(e) => e,
        };
        if let Ok(sections) = ConfigFormat::Json.parse(content) {
            return Ok(sections);
        }
        #[cfg(feature = "yaml")]
        if let Ok(sections) = ConfigFormat::Yaml.parse(content) {
            return Ok(sections);
        }
        Err(first)
    }
}
