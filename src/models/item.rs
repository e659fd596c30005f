use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar field value as it appears in a block resource.
///
/// Resources are hand-edited JSON, so `year` may be `2019` or `"2019"` and both
/// must render the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl FieldValue {
    /// Whether the value counts as present for fallback purposes.
    ///
    /// Empty strings, zero and `false` are treated the same as a missing field.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Self::Flag(b) => *b,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            // `2019.0` prints as `2019`, matching how integers print.
            Self::Number(n) => match n.as_f64() {
                Some(v) if n.is_f64() => write!(f, "{}", v),
                _ => write!(f, "{}", n),
            },
            Self::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// One schedule entry.
///
/// Performances usually carry `artist`/`year`, sessions carry `class`/`location`,
/// but nothing is required: an empty object is a valid item. Items are never
/// mutated after retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<FieldValue>,
    #[serde(
        rename = "class",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub class_name: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<FieldValue>,
}

/// Return the field value only if it is present and non-empty.
pub fn present(field: &Option<FieldValue>) -> Option<&FieldValue> {
    field.as_ref().filter(|v| v.is_present())
}
