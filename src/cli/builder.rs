//! CLI builder - converts registered classes and aliases to a clap Command

use super::aliases::AttributePath;
use crate::component::{AttributeDescriptor, ComponentClass};
use crate::observability::LogLevel;
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::sync::Arc;

/// Flags handled by the tool itself; aliases may not shadow them.
pub const CONTROL_FLAGS: [&str; 7] = [
    "help",
    "help-all",
    "version",
    "config",
    "log-level",
    "log-format",
    "log-file",
];

const ALIAS_HEADING: &str = "Aliases";

/// Argument id of an alias flag.
pub fn alias_id(alias: &str) -> String {
    format!("alias:{}", alias)
}

/// Argument id (and long flag) of a fully-qualified attribute.
pub fn attribute_id(class: &str, attribute: &str) -> String {
    format!("{}.{}", class, attribute)
}

/// Builds a clap Command for one tool invocation
pub struct CliBuilder<'a> {
    program: &'a str,
    about: &'a str,
    version: &'a str,
    classes: &'a [Arc<ComponentClass>],
    aliases: &'a [(String, AttributePath)],
    show_all: bool,
}

impl<'a> CliBuilder<'a> {
    /// Create a new builder
    pub fn new(
        program: &'a str,
        classes: &'a [Arc<ComponentClass>],
        aliases: &'a [(String, AttributePath)],
    ) -> Self {
        Self {
            program,
            about: "",
            version: "",
            classes,
            aliases,
            show_all: false,
        }
    }

    /// Description shown at the top of the help text
    pub fn about(mut self, about: &'a str) -> Self {
        self.about = about;
        self
    }

    /// Version string
    pub fn version(mut self, version: &'a str) -> Self {
        self.version = version;
        self
    }

    /// Show every class attribute in help output (`--help-all`)
    pub fn show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    /// Build the clap Command
    pub fn build(&self) -> Command {
        let mut app = Command::new(self.program.to_string())
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true);

        if !self.about.is_empty() {
            app = app.about(self.about.to_string());
        }
        if !self.version.is_empty() {
            app = app.version(self.version.to_string());
        }

        for arg in Self::control_args() {
            app = app.arg(arg);
        }

        for (alias, path) in self.aliases {
            if let Some(descriptor) = self.descriptor(path) {
                let help = format!("{} (alias for {})", describe(descriptor), path);
                app = app.arg(
                    value_arg(alias_id(alias), alias.clone(), descriptor)
                        .help(help)
                        .help_heading(ALIAS_HEADING),
                );
            }
        }

        for class in self.classes {
            for descriptor in class.configurable_attributes() {
                let id = attribute_id(class.name(), descriptor.name());
                app = app.arg(
                    value_arg(id.clone(), id, descriptor)
                        .help(describe(descriptor))
                        .help_heading(class.name().to_string())
                        .hide(!self.show_all),
                );
            }
        }

        app.after_help(self.after_help())
    }

    fn descriptor(&self, path: &AttributePath) -> Option<&'a AttributeDescriptor> {
        self.classes
            .iter()
            .find(|class| class.name() == path.class)
            .and_then(|class| class.attribute(&path.attribute))
    }

    fn control_args() -> Vec<Arg> {
        vec![
            Arg::new("help")
                .long("help")
                .action(ArgAction::SetTrue)
                .help("Print help for control flags and aliases"),
            Arg::new("help-all")
                .long("help-all")
                .action(ArgAction::SetTrue)
                .help("Print help including every configurable attribute"),
            Arg::new("version")
                .long("version")
                .action(ArgAction::SetTrue)
                .help("Print version"),
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Config file (TOML, JSON or YAML) with one section per class"),
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .action(ArgAction::Set)
                .ignore_case(true)
                .value_parser(PossibleValuesParser::new(LogLevel::NAMES))
                .help("Minimum severity of diagnostic output [default: WARNING]"),
            Arg::new("log-format")
                .long("log-format")
                .value_name("PATTERN")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .help("Diagnostic line pattern using {time}, {level}, {name} and {message}"),
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Also append diagnostic output to this file"),
        ]
    }

    fn after_help(&self) -> String {
        if !self.show_all {
            return "Use --help-all to list every configurable attribute.".to_string();
        }

        let mut text = String::from("Registered classes:");
        for class in self.classes {
            if class.description().is_empty() {
                text.push_str(&format!("\n  {}", class.name()));
            } else {
                text.push_str(&format!("\n  {} - {}", class.name(), class.description()));
            }
        }
        text
    }
}

fn value_arg(id: String, long: String, descriptor: &AttributeDescriptor) -> Arg {
    Arg::new(id)
        .long(long)
        .value_name(descriptor.ty().to_string().to_uppercase())
        .num_args(1)
        .action(ArgAction::Append)
        .allow_negative_numbers(true)
        .value_parser(clap::value_parser!(String))
}

fn describe(descriptor: &AttributeDescriptor) -> String {
    let detail = format!(
        "[{}, default: {}]",
        descriptor.ty(),
        descriptor.default_value()
    );
    if descriptor.help_text().is_empty() {
        detail
    } else {
        format!("{} {}", descriptor.help_text(), detail)
    }
}
