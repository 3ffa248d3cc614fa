//! Value tree produced by a document-understanding model.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Semi-structured output of a document model, before it is mapped onto a
/// [`ReceiptRecord`](crate::ReceiptRecord).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StructuredValue {
    #[default]
    Null,
    Number(f64),
    String(String),
    Mapping(BTreeMap<String, StructuredValue>),
    Sequence(Vec<StructuredValue>),
}

impl StructuredValue {
    /// Look up `key` if this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&StructuredValue> {
        match self {
            StructuredValue::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Follow a path of mapping keys. An empty path yields `self`.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&StructuredValue> {
        path.iter()
            .try_fold(self, |node, key| node.get(key.as_ref()))
    }

    /// Whether the value carries any content.
    ///
    /// Null, empty strings, zero, and empty containers are all empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            StructuredValue::Null => false,
            StructuredValue::Number(n) => *n != 0.0,
            StructuredValue::String(s) => !s.is_empty(),
            StructuredValue::Mapping(map) => !map.is_empty(),
            StructuredValue::Sequence(items) => !items.is_empty(),
        }
    }

    /// Render the value as field text.
    ///
    /// Strings are returned verbatim, numbers in their shortest decimal form,
    /// containers as compact JSON. Null has no text.
    pub fn to_text(&self) -> Result<Option<String>, serde_json::Error> {
        match self {
            StructuredValue::Null => Ok(None),
            StructuredValue::Number(n) => Ok(Some(n.to_string())),
            StructuredValue::String(s) => Ok(Some(s.clone())),
            StructuredValue::Mapping(_) | StructuredValue::Sequence(_) => {
                serde_json::to_string(self).map(Some)
            }
        }
    }

    /// Pretty-print the tree with two-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<serde_json::Value> for StructuredValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => StructuredValue::Null,
            // Booleans have no slot in the tree: `false` is empty, `true` keeps its text.
            serde_json::Value::Bool(false) => StructuredValue::Null,
            serde_json::Value::Bool(true) => StructuredValue::String("true".to_string()),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(StructuredValue::Number)
                .unwrap_or_else(|| StructuredValue::String(n.to_string())),
            serde_json::Value::String(s) => StructuredValue::String(s),
            serde_json::Value::Array(items) => {
                StructuredValue::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => StructuredValue::Mapping(
                map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for StructuredValue {
    fn from(s: &str) -> Self {
        StructuredValue::String(s.to_string())
    }
}

impl From<String> for StructuredValue {
    fn from(s: String) -> Self {
        StructuredValue::String(s)
    }
}

impl From<f64> for StructuredValue {
    fn from(n: f64) -> Self {
        StructuredValue::Number(n)
    }
}

impl<'de> Deserialize<'de> for StructuredValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl std::str::FromStr for StructuredValue {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}
