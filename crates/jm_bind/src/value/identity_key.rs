use std::fmt;

use serde_core::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use super::Value;

/// The key that stands for an object once it has been emitted in full.
///
/// Keys come from an identity property (integers and strings) or from the
/// per-call sequence generator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Int(i64),
    Str(String),
}

impl IdentityKey {
    /// Reads a key from a property value; `None` for values that cannot
    /// identify an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(IdentityKey::Int(*i)),
            Value::String(s) => Some(IdentityKey::Str(s.clone())),
            _ => None,
        }
    }

    /// Reads a key from a JSON node; `None` for non-scalar or null nodes.
    pub fn from_json(node: &JsonValue) -> Option<Self> {
        match node {
            JsonValue::Number(n) => n.as_i64().map(IdentityKey::Int),
            JsonValue::String(s) => Some(IdentityKey::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Int(i) => fmt::Display::fmt(i, f),
            IdentityKey::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl Serialize for IdentityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IdentityKey::Int(i) => serializer.serialize_i64(*i),
            IdentityKey::Str(s) => serializer.serialize_str(s),
        }
    }
}
