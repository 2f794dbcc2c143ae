//! Attribute sets attached to configurations, dependencies and variants.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The value of a single attribute.
///
/// `Typed` carries a named domain type (e.g. `Usage` = `java-runtime`); two
/// values only compare structurally when their declared types agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i64),
    String(String),
    Typed {
        #[serde(rename = "type")]
        type_name: String,
        value: String,
    },
}

impl AttributeValue {
    pub fn typed(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Typed {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    /// Name of the declared type.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::String(_) => "String",
            Self::Typed { type_name, .. } => type_name,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
            Self::Typed { value, .. } => f.write_str(value),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

/// An immutable-by-convention set of attributes keyed by name, iterated in
/// name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet {
    entries: BTreeMap<String, AttributeValue>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union of `self` and `other`; on a name collision `other` wins.
    pub fn concat(&self, other: &AttributeSet) -> AttributeSet {
        let mut entries = self.entries.clone();
        for (name, value) in &other.entries {
            entries.insert(name.clone(), value.clone());
        }
        AttributeSet { entries }
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}
