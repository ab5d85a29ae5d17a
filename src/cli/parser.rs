//! Argument parser: argv to a command-line configuration fragment.

use super::aliases::{AliasTable, AttributePath};
use super::builder::{alias_id, attribute_id, CliBuilder, CONTROL_FLAGS};
use super::error::{CliError, CliResult};
use crate::component::{ComponentClass, Value};
use crate::config::{Fragment, Source};
use crate::observability::LogLevel;
use clap::ArgMatches;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Help output requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRequest {
    /// `--help-all` rather than `--help`
    pub all: bool,
    /// Rendered help text
    pub text: String,
}

/// Everything the tool needs to configure itself from one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgs {
    /// Command-line values keyed by `Class.attribute`
    pub fragment: Fragment,
    /// `--config PATH`
    pub config_file: Option<PathBuf>,
    /// `--log-level LEVEL`
    pub log_level: Option<LogLevel>,
    /// `--log-format PATTERN`
    pub log_format: Option<String>,
    /// `--log-file PATH`
    pub log_file: Option<PathBuf>,
}

/// Result of parsing one argv.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// `--help` or `--help-all`; nothing else should run.
    Usage(UsageRequest),
    /// `--version`; nothing else should run.
    Version(String),
    /// Normal invocation
    Configure(ParsedArgs),
}

/// Parser for a fixed set of classes and aliases.
///
/// Every configurable attribute of every registered class is reachable as
/// `--Class.attribute VALUE`; aliases add short forms such as
/// `--iterations VALUE`. A flag given twice keeps its last value, and an
/// alias and its fully-qualified form count as the same flag.
#[derive(Debug, Clone)]
pub struct ArgumentParser {
    program: String,
    about: String,
    version: String,
    classes: Vec<Arc<ComponentClass>>,
    aliases: Vec<(String, AttributePath)>,
}

impl ArgumentParser {
    /// Create a parser, validating the class names and every alias against
    /// the registered classes.
    pub fn new(
        program: impl Into<String>,
        classes: &[Arc<ComponentClass>],
        aliases: &AliasTable,
    ) -> CliResult<Self> {
        let mut seen = BTreeSet::new();
        if let Some(class) = classes.iter().find(|class| !seen.insert(class.name())) {
            return Err(CliError::DuplicateClass {
                class: class.name().to_string(),
            });
        }

        let mut resolved = Vec::with_capacity(aliases.len());

        for (alias, _) in aliases.iter() {
            if CONTROL_FLAGS.contains(&alias) {
                return Err(CliError::alias(alias, "shadows a built-in flag"));
            }
            if !alias.starts_with(|c: char| c.is_alphanumeric()) {
                return Err(CliError::alias(
                    alias,
                    "alias names must start with a letter or digit",
                ));
            }
            if alias.contains(|c: char| c == '.' || c == '=' || c.is_whitespace()) {
                return Err(CliError::alias(
                    alias,
                    "alias names may not contain `.`, `=` or whitespace",
                ));
            }

            let path = aliases.resolve(alias)?;
            let class = classes
                .iter()
                .find(|class| class.name() == path.class)
                .ok_or_else(|| {
                    CliError::alias(alias, format!("class `{}` is not registered", path.class))
                })?;
            match class.attribute(&path.attribute) {
                None => {
                    return Err(CliError::alias(
                        alias,
                        format!("`{}` is not a declared attribute", path),
                    ))
                }
                Some(descriptor) if !descriptor.is_configurable() => {
                    return Err(CliError::alias(
                        alias,
                        format!("`{}` is not configurable", path),
                    ))
                }
                Some(_) => {}
            }

            resolved.push((alias.to_string(), path));
        }

        Ok(Self {
            program: program.into(),
            about: String::new(),
            version: String::new(),
            classes: classes.to_vec(),
            aliases: resolved,
        })
    }

    /// Description shown in help output
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    /// Version reported by `--version`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    fn builder(&self) -> CliBuilder<'_> {
        CliBuilder::new(&self.program, &self.classes, &self.aliases)
            .about(&self.about)
            .version(&self.version)
    }

    /// Help text; `all` includes every class attribute.
    pub fn render_usage(&self, all: bool) -> String {
        self.builder().show_all(all).build().render_help().to_string()
    }

    /// Parse arguments (without the program name).
    pub fn parse<I, S>(&self, args: I) -> CliResult<ParseOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = std::iter::once(self.program.clone()).chain(args.into_iter().map(Into::into));
        let matches = self
            .builder()
            .build()
            .try_get_matches_from(argv)
            .map_err(CliError::from_clap)?;

        if matches.get_flag("help-all") {
            return Ok(ParseOutcome::Usage(UsageRequest {
                all: true,
                text: self.render_usage(true),
            }));
        }
        if matches.get_flag("help") {
            return Ok(ParseOutcome::Usage(UsageRequest {
                all: false,
                text: self.render_usage(false),
            }));
        }
        if matches.get_flag("version") {
            return Ok(ParseOutcome::Version(
                self.builder().build().render_version().trim_end().to_string(),
            ));
        }

        let log_level = match matches.get_one::<String>("log-level") {
            Some(name) => Some(name.parse::<LogLevel>().map_err(|e| {
                CliError::InvalidArgument {
                    message: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(ParseOutcome::Configure(ParsedArgs {
            fragment: self.collect_fragment(&matches),
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            log_level,
            log_format: matches.get_one::<String>("log-format").cloned(),
            log_file: matches.get_one::<PathBuf>("log-file").cloned(),
        }))
    }

    /// Gather every attribute occurrence in argv order so later ones win.
    fn collect_fragment(&self, matches: &ArgMatches) -> Fragment {
        let mut occurrences: Vec<(usize, AttributePath, String)> = Vec::new();

        let alias_ids = self
            .aliases
            .iter()
            .map(|(alias, path)| (alias_id(alias), path.clone()));
        let class_ids = self.classes.iter().flat_map(|class| {
            class.configurable_attributes().map(move |descriptor| {
                (
                    attribute_id(class.name(), descriptor.name()),
                    AttributePath::new(class.name(), descriptor.name()),
                )
            })
        });

        for (id, path) in alias_ids.chain(class_ids) {
            let (Some(indices), Some(values)) =
                (matches.indices_of(&id), matches.get_many::<String>(&id))
            else {
                continue;
            };
            for (index, value) in indices.zip(values) {
                occurrences.push((index, path.clone(), value.clone()));
            }
        }

        occurrences.sort_by_key(|(index, _, _)| *index);

        let mut fragment = Fragment::new(Source::CommandLine);
        for (_, path, raw) in occurrences {
            fragment.insert(path.class, path.attribute, Value::Text(raw));
        }
        fragment
    }
}
