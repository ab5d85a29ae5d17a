//! Configuration store: multi-source precedence merge.
//!
//! # Precedence Order
//! 1. Programmatic assignment (highest priority)
//! 2. Command-line flags
//! 3. Configuration file
//! 4. Declared defaults (lowest priority)
//!
//! Merging is key-for-key: a fragment only overrides the `(class, attribute)`
//! pairs it actually contains.

use crate::component::{ComponentClass, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Nested `class -> attribute -> value` mapping.
pub type Sections = BTreeMap<String, BTreeMap<String, Value>>;

/// Precedence rank of a configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Precedence {
    /// Declared attribute defaults
    Defaults,
    /// Structured config file
    File,
    /// Command-line flags
    CommandLine,
    /// Direct assignment from code
    Programmatic,
}

/// Where a fragment came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Declared attribute defaults
    Defaults,
    /// A config file at the given path
    File(PathBuf),
    /// Command-line flags
    CommandLine,
    /// Direct assignment from code
    Programmatic,
}

impl Source {
    /// Rank used when merging a fragment from this source.
    pub fn precedence(&self) -> Precedence {
        match self {
            Source::Defaults => Precedence::Defaults,
            Source::File(_) => Precedence::File,
            Source::CommandLine => Precedence::CommandLine,
            Source::Programmatic => Precedence::Programmatic,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Defaults => f.write_str("defaults"),
            Source::File(path) => write!(f, "file {}", path.display()),
            Source::CommandLine => f.write_str("command line"),
            Source::Programmatic => f.write_str("programmatic"),
        }
    }
}

/// A partial configuration produced by one source.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    source: Source,
    values: Sections,
}

impl Fragment {
    /// Create an empty fragment.
    pub fn new(source: Source) -> Self {
        Self {
            source,
            values: Sections::new(),
        }
    }

    /// Create a fragment from already nested values.
    pub fn from_sections(source: Source, values: Sections) -> Self {
        Self { source, values }
    }

    /// Set one value; a later insert for the same key replaces the earlier one.
    pub fn insert(&mut self, class: impl Into<String>, attribute: impl Into<String>, value: Value) {
        self.values
            .entry(class.into())
            .or_default()
            .insert(attribute.into(), value);
    }

    /// Look up one value.
    pub fn get(&self, class: &str, attribute: &str) -> Option<&Value> {
        self.values.get(class).and_then(|section| section.get(attribute))
    }

    /// Source of this fragment
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Nested values
    pub fn sections(&self) -> &Sections {
        &self.values
    }

    /// Iterate over `(class, attribute, value)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.values.iter().flat_map(|(class, section)| {
            section
                .iter()
                .map(move |(attribute, value)| (class.as_str(), attribute.as_str(), value))
        })
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    /// Whether the fragment holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Why a merged key was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIssue {
    /// The class is not registered with the tool
    UnknownClass,
    /// The class has no such attribute
    UnknownAttribute,
    /// The attribute exists but cannot be set from configuration
    NotConfigurable,
}

/// Non-fatal warning for a key the store did not accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedKey {
    /// Class section name
    pub class: String,
    /// Attribute name
    pub attribute: String,
    /// Reason the key was rejected
    pub issue: KeyIssue,
    /// Fragment source that supplied it
    pub source: Source,
}

impl fmt::Display for UnrecognizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.issue {
            KeyIssue::UnknownClass => "class is not registered",
            KeyIssue::UnknownAttribute => "attribute is not declared",
            KeyIssue::NotConfigurable => "attribute is not configurable",
        };
        write!(
            f,
            "unrecognized config key {}.{} from {}: {}",
            self.class, self.attribute, self.source, reason
        )
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    precedence: Precedence,
}

/// The merged, precedence-resolved configuration of a tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    classes: BTreeMap<String, Arc<ComponentClass>>,
    entries: BTreeMap<String, BTreeMap<String, Entry>>,
    provenance: Vec<Source>,
    unrecognized: Vec<UnrecognizedKey>,
}

impl ConfigStore {
    /// Create an empty store with no registered classes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one entry per configurable attribute of each registered class.
    pub fn from_defaults(classes: &[Arc<ComponentClass>]) -> Self {
        let mut store = Self::new();
        let mut defaults = Fragment::new(Source::Defaults);

        for class in classes {
            store
                .classes
                .insert(class.name().to_string(), Arc::clone(class));
            for descriptor in class.configurable_attributes() {
                defaults.insert(
                    class.name(),
                    descriptor.name(),
                    descriptor.default_value().clone(),
                );
            }
        }

        store.merge(&defaults);
        store
    }

    /// Merge a fragment at the precedence of its source.
    pub fn merge(&mut self, fragment: &Fragment) {
        self.merge_ranked(fragment, fragment.source().precedence());
    }

    /// Merge a fragment at an explicit rank.
    ///
    /// A key is overwritten when `rank` is at least the rank of its last
    /// writer, so equal ranks resolve in merge-call order. Values that
    /// satisfy the declared type are stored coerced; the rest are stored raw
    /// and fail when a component is constructed from them.
    pub fn merge_ranked(&mut self, fragment: &Fragment, rank: Precedence) {
        self.provenance.push(fragment.source().clone());

        for (class, attribute, value) in fragment.iter() {
            if let Some(issue) = self.check_key(class, attribute) {
                let key = UnrecognizedKey {
                    class: class.to_string(),
                    attribute: attribute.to_string(),
                    issue,
                    source: fragment.source().clone(),
                };
                if !self.unrecognized.contains(&key) {
                    self.unrecognized.push(key);
                }
                continue;
            }
            let value = self
                .classes
                .get(class)
                .and_then(|registered| registered.attribute(attribute))
                .and_then(|descriptor| descriptor.validate(value).ok())
                .unwrap_or_else(|| value.clone());
            self.write(class, attribute, value, rank);
        }
    }

    /// Record a programmatic assignment made after construction.
    ///
    /// Keys the store does not track (unregistered classes, non-configurable
    /// attributes) are ignored.
    pub fn assign(&mut self, class: &str, attribute: &str, value: Value) {
        if self.check_key(class, attribute).is_none() {
            self.write(class, attribute, value, Precedence::Programmatic);
        }
    }

    fn write(&mut self, class: &str, attribute: &str, value: Value, rank: Precedence) {
        let section = self.entries.entry(class.to_string()).or_default();
        if let Some(existing) = section.get(attribute) {
            if rank < existing.precedence {
                return;
            }
        }
        section.insert(
            attribute.to_string(),
            Entry {
                value,
                precedence: rank,
            },
        );
    }

    fn check_key(&self, class: &str, attribute: &str) -> Option<KeyIssue> {
        let Some(registered) = self.classes.get(class) else {
            return Some(KeyIssue::UnknownClass);
        };
        match registered.attribute(attribute) {
            None => Some(KeyIssue::UnknownAttribute),
            Some(descriptor) if !descriptor.is_configurable() => Some(KeyIssue::NotConfigurable),
            Some(_) => None,
        }
    }

    /// Resolved attribute values for one class.
    pub fn section_for(&self, class: &str) -> BTreeMap<String, Value> {
        self.entries
            .get(class)
            .map(|section| {
                section
                    .iter()
                    .map(|(name, entry)| (name.clone(), entry.value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolved value of one key.
    pub fn get(&self, class: &str, attribute: &str) -> Option<&Value> {
        self.entries
            .get(class)
            .and_then(|section| section.get(attribute))
            .map(|entry| &entry.value)
    }

    /// Rank of the source that last wrote a key.
    pub fn precedence_of(&self, class: &str, attribute: &str) -> Option<Precedence> {
        self.entries
            .get(class)
            .and_then(|section| section.get(attribute))
            .map(|entry| entry.precedence)
    }

    /// Keys rejected during merges, in the order they were seen.
    pub fn unrecognized_keys(&self) -> &[UnrecognizedKey] {
        &self.unrecognized
    }

    /// Sources merged so far, in merge order.
    pub fn provenance(&self) -> &[Source] {
        &self.provenance
    }

    /// Registered class by name.
    pub fn class(&self, name: &str) -> Option<&Arc<ComponentClass>> {
        self.classes.get(name)
    }

    /// The whole resolved configuration.
    pub fn snapshot(&self) -> Sections {
        self.entries
            .keys()
            .map(|class| (class.clone(), self.section_for(class)))
            .collect()
    }
}
