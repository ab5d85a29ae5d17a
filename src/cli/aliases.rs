//! Short command-line aliases for fully-qualified attribute paths.

use super::error::{CliError, CliResult};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A fully-qualified `Class.attribute` path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributePath {
    /// Class name
    pub class: String,
    /// Attribute name
    pub attribute: String,
}

impl AttributePath {
    /// Create a path from its parts.
    pub fn new(class: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            attribute: attribute.into(),
        }
    }
}

impl FromStr for AttributePath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((class, attribute))
                if !class.is_empty() && !attribute.is_empty() && !attribute.contains('.') =>
            {
                Ok(Self::new(class, attribute))
            }
            _ => Err(format!("`{}` is not of the form Class.attribute", s)),
        }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.attribute)
    }
}

/// Mapping from short flag names to `Class.attribute` targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`AliasTable::insert`].
    pub fn add(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.insert(alias, target);
        self
    }

    /// Map `alias` to `target`; a repeated alias replaces the earlier target.
    pub fn insert(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(alias.into(), target.into());
    }

    /// Raw target of an alias.
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Parse the target of an alias into a path.
    pub fn resolve(&self, alias: &str) -> CliResult<AttributePath> {
        let target = self
            .get(alias)
            .ok_or_else(|| CliError::alias(alias, "no such alias"))?;
        target
            .parse::<AttributePath>()
            .map_err(|reason| CliError::alias(alias, reason))
    }

    /// Iterate over `(alias, target)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
    }

    /// Number of aliases
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl<A: Into<String>, T: Into<String>> FromIterator<(A, T)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (A, T)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (alias, target) in iter {
            table.insert(alias, target);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute_path() {
        let path: AttributePath = "MyTool.iterations".parse().unwrap();
        assert_eq!(path, AttributePath::new("MyTool", "iterations"));
        assert_eq!(path.to_string(), "MyTool.iterations");

        assert!("iterations".parse::<AttributePath>().is_err());
        assert!(".iterations".parse::<AttributePath>().is_err());
        assert!("A.b.c".parse::<AttributePath>().is_err());
    }

    #[test]
    fn test_resolve_alias() {
        let table = AliasTable::new()
            .add("iterations", "MyTool.iterations")
            .add("broken", "nodot");

        assert_eq!(
            table.resolve("iterations").unwrap(),
            AttributePath::new("MyTool", "iterations")
        );
        assert!(matches!(
            table.resolve("broken"),
            Err(CliError::InvalidAlias { .. })
        ));
        assert!(table.resolve("missing").is_err());
    }

    #[test]
    fn test_from_iter_last_wins() {
        let table: AliasTable = [("out", "A.outfile"), ("out", "B.outfile")]
            .into_iter()
            .collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("out"), Some("B.outfile"));
    }
}
