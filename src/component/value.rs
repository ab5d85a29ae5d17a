//! Attribute values and the closed set of attribute types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A raw or validated attribute value.
///
/// Config documents deserialize straight into this type, command-line values
/// arrive as [`Value::Text`] and are coerced by [`AttrType::coerce`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Free text
    Text(String),
    /// Sequence of scalars
    List(Vec<Value>),
    /// Mapping from text keys to scalars
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Whether this value is a scalar (bool, integer, float or text).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Text(_)
        )
    }

    /// Integer payload, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float payload; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// List payload, if any.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Map payload, if any.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

/// The closed set of attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    /// Exact integral value
    Integer,
    /// Floating point value
    Float,
    /// Free text
    Text,
    /// Recognized true/false token
    Boolean,
    /// List of scalars
    List,
    /// Mapping of scalars
    Map,
}

const TRUE_TOKENS: [&str; 4] = ["true", "yes", "on", "1"];
const FALSE_TOKENS: [&str; 4] = ["false", "no", "off", "0"];

impl AttrType {
    /// Coerce `value` into this type, or `None` if it does not conform.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match self {
            AttrType::Integer => match value {
                Value::Int(i) => Some(Value::Int(*i)),
                Value::Float(x) => integral(*x).map(Value::Int),
                Value::Text(s) => {
                    let s = s.trim();
                    s.parse::<i64>()
                        .ok()
                        .or_else(|| s.parse::<f64>().ok().and_then(integral))
                        .map(Value::Int)
                }
                _ => None,
            },
            AttrType::Float => match value {
                Value::Float(x) => Some(Value::Float(*x)),
                Value::Int(i) => Some(Value::Float(*i as f64)),
                Value::Text(s) => s.trim().parse::<f64>().ok().map(Value::Float),
                _ => None,
            },
            AttrType::Boolean => match value {
                Value::Bool(b) => Some(Value::Bool(*b)),
                Value::Text(s) => {
                    let token = s.trim().to_lowercase();
                    if TRUE_TOKENS.contains(&token.as_str()) {
                        Some(Value::Bool(true))
                    } else if FALSE_TOKENS.contains(&token.as_str()) {
                        Some(Value::Bool(false))
                    } else {
                        None
                    }
                }
                _ => None,
            },
            AttrType::Text => match value {
                Value::Text(s) => Some(Value::Text(s.clone())),
                Value::Bool(b) => Some(Value::Text(b.to_string())),
                Value::Int(i) => Some(Value::Text(i.to_string())),
                Value::Float(x) => Some(Value::Text(x.to_string())),
                _ => None,
            },
            AttrType::List => match value {
                Value::List(items) if items.iter().all(Value::is_scalar) => {
                    Some(Value::List(items.clone()))
                }
                Value::Text(s) => parse_list(s),
                _ => None,
            },
            AttrType::Map => match value {
                Value::Map(map) if map.values().all(Value::is_scalar) => {
                    Some(Value::Map(map.clone()))
                }
                Value::Text(s) => {
                    let s = s.trim();
                    if !s.starts_with('{') {
                        return None;
                    }
                    serde_json::from_str::<BTreeMap<String, Value>>(s)
                        .ok()
                        .filter(|map| map.values().all(Value::is_scalar))
                        .map(Value::Map)
                }
                _ => None,
            },
        }
    }
}

fn integral(x: f64) -> Option<i64> {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        Some(x as i64)
    } else {
        None
    }
}

fn parse_list(s: &str) -> Option<Value> {
    let s = s.trim();
    if s.starts_with('[') {
        return serde_json::from_str::<Vec<Value>>(s)
            .ok()
            .filter(|items| items.iter().all(Value::is_scalar))
            .map(Value::List);
    }
    if s.is_empty() {
        return Some(Value::List(Vec::new()));
    }
    Some(Value::List(
        s.split(',')
            .map(|item| Value::Text(item.trim().to_string()))
            .collect(),
    ))
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttrType::Integer => "integer",
            AttrType::Float => "float",
            AttrType::Text => "text",
            AttrType::Boolean => "boolean",
            AttrType::List => "list",
            AttrType::Map => "map",
        };
        f.write_str(name)
    }
}
