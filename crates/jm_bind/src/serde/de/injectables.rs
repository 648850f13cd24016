use std::collections::BTreeMap;

use crate::value::{Value, ValueType};

/// Caller-supplied values for injected properties and creator arguments.
///
/// Keys are explicit injection keys, or the name of the declared value type
/// when none was given (see [`with_type`](Self::with_type)).
///
/// # Examples
///
/// ```
/// use jm_bind::serde::InjectableValues;
/// use jm_bind::value::{Value, ValueType};
///
/// let values = InjectableValues::new()
///     .with("tenant", "acme")
///     .with_type(&ValueType::Int, 2);
///
/// assert_eq!(values.get("tenant"), Some(&Value::from("acme")));
/// assert_eq!(values.get("int"), Some(&Value::Int(2)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InjectableValues {
    values: BTreeMap<String, Value>,
}

impl InjectableValues {
    #[inline]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Adds a value keyed by a type name.
    pub fn with_type(self, value_type: &ValueType, value: impl Into<Value>) -> Self {
        self.with(value_type.name(), value)
    }

    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
