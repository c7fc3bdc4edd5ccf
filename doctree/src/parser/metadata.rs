//! Front-matter metadata: an insertion-ordered map of loosely typed values.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single front-matter value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<String>),
}

impl MetaValue {
    /// JavaScript-style truthiness, except that an empty list counts as missing.
    pub fn is_truthy(&self) -> bool {
        match self {
            MetaValue::Null => false,
            MetaValue::Bool(b) => *b,
            MetaValue::Number(n) => *n != 0.0 && !n.is_nan(),
            MetaValue::String(s) => !s.is_empty(),
            MetaValue::List(items) => !items.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Number(n) => Some(*n),
            MetaValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl Serialize for MetaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetaValue::Null => serializer.serialize_unit(),
            MetaValue::Bool(b) => serializer.serialize_bool(*b),
            MetaValue::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            MetaValue::String(s) => serializer.serialize_str(s),
            MetaValue::List(items) => items.serialize(serializer),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Null => Ok(()),
            MetaValue::Bool(b) => write!(f, "{b}"),
            MetaValue::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            MetaValue::String(s) => f.write_str(s),
            MetaValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::String(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::String(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Number(value)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(value: Vec<String>) -> Self {
        MetaValue::List(value)
    }
}

/// Whole numbers print without a fractional part.
pub(crate) fn integral(n: f64) -> Option<i64> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        Some(n as i64)
    } else {
        None
    }
}

/// Publication status recognized in the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    Draft,
    Review,
    Published,
}

impl DocStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocStatus::Draft => "draft",
            DocStatus::Review => "review",
            DocStatus::Published => "published",
        }
    }
}

impl FromStr for DocStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(DocStatus::Draft),
            "review" => Ok(DocStatus::Review),
            "published" => Ok(DocStatus::Published),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

impl fmt::Display for DocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document metadata. Keys keep the order in which they were first inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Option<MetaValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `field` is present and truthy.
    pub fn has_value(&self, field: &str) -> bool {
        self.get(field).is_some_and(MetaValue::is_truthy)
    }

    fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(MetaValue::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.non_empty_str("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.non_empty_str("description")
    }


    /// Tags as a list. A bare string value is treated as a single tag.
    pub fn tags(&self) -> Vec<&str> {
        match self.get("tags") {
            Some(MetaValue::List(items)) => items.iter().map(String::as_str).collect(),
            Some(MetaValue::String(s)) if !s.is_empty() => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    /// Raw status string, whether or not it is a recognized [`DocStatus`].
    pub fn status_str(&self) -> Option<&str> {
        self.non_empty_str("status")
    }

    pub fn status(&self) -> Option<DocStatus> {
        self.status_str().and_then(|s| s.parse().ok())
    }

    pub fn order(&self) -> Option<f64> {
        self.get("order").and_then(MetaValue::as_f64)
    }

    /// Sort key for `order`; documents without one sort last.
    pub fn sort_order(&self) -> f64 {
        self.order().filter(|n| !n.is_nan()).unwrap_or(f64::INFINITY)
    }
}

impl<K: Into<String>, V: Into<MetaValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetadataVisitor;

        impl<'de> Visitor<'de> for MetadataVisitor {
            type Value = Metadata;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of metadata fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Metadata, A::Error> {
                let mut metadata = Metadata::new();
                while let Some((key, value)) = access.next_entry::<String, MetaValue>()? {
                    metadata.insert(key, value);
                }
                Ok(metadata)
            }
        }

        deserializer.deserialize_map(MetadataVisitor)
    }
}
