//! Metadata values
//!
//! The host stores arbitrary values under a metadata key. [`MetaValue`]
//! closes that set into scalar strings, other scalars, ordered sequences
//! and string-keyed records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single metadata value as held by the host store.
///
/// Serializes untagged, so the JSON form is the natural one:
/// `null`, `true`, `3`, `"red"`, `["a", "b"]`, `{"k": 1}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<MetaValue>),
    Record(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    /// Build a record from `(field, value)` pairs
    pub fn record<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<MetaValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        MetaValue::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// True for lists and records
    pub fn is_structured(&self) -> bool {
        matches!(self, MetaValue::List(_) | MetaValue::Record(_))
    }

    /// Whether the host treats this value as "empty".
    ///
    /// Null, `false`, zero, the empty string, the string `"0"` and empty
    /// collections all count as empty.
    pub fn is_empty_like(&self) -> bool {
        match self {
            MetaValue::Null => true,
            MetaValue::Bool(b) => !b,
            MetaValue::Int(i) => *i == 0,
            MetaValue::Float(f) => *f == 0.0,
            MetaValue::Str(s) => s.is_empty() || s == "0",
            MetaValue::List(items) => items.is_empty(),
            MetaValue::Record(fields) => fields.is_empty(),
        }
    }

    /// Apply `f` to every string leaf, producing a new value.
    ///
    /// Lists are mapped element-wise and records field-wise. Record field
    /// names and non-string scalars are left untouched.
    pub fn map_strings<F>(&self, f: &F) -> MetaValue
    where
        F: Fn(&str) -> String,
    {
        match self {
            MetaValue::Str(s) => MetaValue::Str(f(s)),
            MetaValue::List(items) => {
                MetaValue::List(items.iter().map(|v| v.map_strings(f)).collect())
            }
            MetaValue::Record(fields) => MetaValue::Record(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.map_strings(f)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Reverse the host's generic serialization.
    ///
    /// Structured values that reached the store as text are kept in their
    /// JSON form. A string holding a JSON list or object is decoded back
    /// into the structured value; anything else is returned unchanged.
    pub fn maybe_unserialize(&self) -> MetaValue {
        let MetaValue::Str(s) = self else {
            return self.clone();
        };
        let trimmed = s.trim_start();
        if !(trimmed.starts_with('[') || trimmed.starts_with('{')) {
            return self.clone();
        }
        match serde_json::from_str::<MetaValue>(s) {
            Ok(decoded) if decoded.is_structured() => decoded,
            _ => self.clone(),
        }
    }

    /// Human-readable textual form of the value.
    ///
    /// Scalars print the way the host echoes them (`true` as `1`, `false`
    /// and null as nothing). Lists and records print as an indented
    /// `Array ( [key] => value )` listing.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        write_dump(self, 0, &mut out);
        out
    }
}

fn write_dump(value: &MetaValue, indent: usize, out: &mut String) {
    match value {
        MetaValue::List(items) => {
            let entries = items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v));
            write_array(entries, indent, out);
        }
        MetaValue::Record(fields) => {
            let entries = fields.iter().map(|(k, v)| (k.clone(), v));
            write_array(entries, indent, out);
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_array<'a, I>(entries: I, indent: usize, out: &mut String)
where
    I: Iterator<Item = (String, &'a MetaValue)>,
{
    let pad = " ".repeat(indent);
    out.push_str("Array\n");
    out.push_str(&pad);
    out.push_str("(\n");
    for (key, value) in entries {
        out.push_str(&pad);
        out.push_str(&format!("    [{}] => ", key));
        write_dump(value, indent + 8, out);
        out.push('\n');
    }
    out.push_str(&pad);
    out.push_str(")\n");
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Null => Ok(()),
            MetaValue::Bool(true) => write!(f, "1"),
            MetaValue::Bool(false) => Ok(()),
            MetaValue::Int(i) => write!(f, "{}", i),
            MetaValue::Float(x) => write!(f, "{}", x),
            MetaValue::Str(s) => write!(f, "{}", s),
            MetaValue::List(_) | MetaValue::Record(_) => write!(f, "{}", self.dump()),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Str(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Str(s)
    }
}

impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        MetaValue::Int(i)
    }
}

impl From<f64> for MetaValue {
    fn from(x: f64) -> Self {
        MetaValue::Float(x)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

impl From<Vec<MetaValue>> for MetaValue {
    fn from(items: Vec<MetaValue>) -> Self {
        MetaValue::List(items)
    }
}

impl From<serde_json::Value> for MetaValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => MetaValue::Null,
            Value::Bool(b) => MetaValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => MetaValue::Int(i),
                None => MetaValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => MetaValue::Str(s),
            Value::Array(items) => MetaValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(fields) => {
                MetaValue::Record(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
