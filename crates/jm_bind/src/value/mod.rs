//! The runtime value model converted by the mapper.
//!
//! ## Menu
//!
//! - [`Value`]: A dynamic value, the caller-owned side of every conversion.
//! - [`Object`]: A described object: a type name plus declared field values.
//! - [`ObjectRef`]: A shared, mutable handle to an [`Object`]. Two sites holding
//!   clones of the same handle observe the same instance.
//! - [`ValueType`]: The declared type of a field, accessor or creator argument.
//! - [`IdentityKey`]: The key used to recognise repeated instances of one object.
//!
//! Objects are plain data, they do not carry behaviour. Accessors, creators and
//! hooks live in the [type registry](crate::registry::TypeRegistry).

// -----------------------------------------------------------------------------
// Modules

mod identity_key;
mod object;
mod value_type;

// -----------------------------------------------------------------------------
// Exports

pub use identity_key::IdentityKey;
pub use object::{Object, ObjectRef};
pub use value_type::ValueType;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

// -----------------------------------------------------------------------------
// Value

/// A dynamic value.
///
/// `Map` uses a [`BTreeMap`], so catch-all entries are emitted in key order.
///
/// # Examples
///
/// ```
/// use jm_bind::value::{Object, Value};
///
/// let owner = Value::from(Object::new("User").with("id", 1).with("name", "John"));
///
/// let object = owner.as_object().unwrap();
/// assert_eq!(object.get("name"), Some(Value::from("John")));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(ObjectRef),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for null, empty strings, empty lists and empty maps.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `f64`, integers are widened.
    #[inline]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// A short name of the value's shape, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::Int(value as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<NaiveDateTime> for Value {
    #[inline]
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    #[inline]
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl From<ObjectRef> for Value {
    #[inline]
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

impl From<Object> for Value {
    #[inline]
    fn from(value: Object) -> Self {
        Value::Object(ObjectRef::new(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Object, Value};

    #[test]
    fn emptiness() {
        assert!(Value::Null.is_empty());
        assert!(Value::from("").is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(!Value::from(0).is_empty());
        assert!(!Value::from(Object::new("Empty")).is_empty());
    }

    #[test]
    fn option_conversion() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Int(3));
        assert_eq!(Value::from(2).as_f64(), Some(2.0));
    }
}
