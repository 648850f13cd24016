use std::borrow::Cow;
use std::fmt;

use super::Value;

/// The declared type of a field, accessor or creator argument.
///
/// Object types are referred to by registered name. The type decides how a
/// JSON node is materialized and what a missing value defaults to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Any JSON value, materialized in its natural shape.
    Any,
    Bool,
    Int,
    Float,
    String,
    DateTime,
    Object(&'static str),
    List(Box<ValueType>),
    Map(Box<ValueType>),
}

impl ValueType {
    #[inline]
    pub fn list(element: ValueType) -> Self {
        ValueType::List(Box::new(element))
    }

    #[inline]
    pub fn map(element: ValueType) -> Self {
        ValueType::Map(Box::new(element))
    }

    /// The value a freshly instantiated object holds for this type.
    pub const fn default_value(&self) -> Value {
        match self {
            ValueType::Bool => Value::Bool(false),
            ValueType::Int => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            _ => Value::Null,
        }
    }

    /// The type's name; also the key used to inject values by type.
    ///
    /// ```
    /// use jm_bind::value::ValueType;
    ///
    /// assert_eq!(ValueType::Int.name(), "int");
    /// assert_eq!(ValueType::list(ValueType::Object("Item")).name(), "list<Item>");
    /// ```
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            ValueType::Any => Cow::Borrowed("any"),
            ValueType::Bool => Cow::Borrowed("bool"),
            ValueType::Int => Cow::Borrowed("int"),
            ValueType::Float => Cow::Borrowed("float"),
            ValueType::String => Cow::Borrowed("string"),
            ValueType::DateTime => Cow::Borrowed("datetime"),
            ValueType::Object(name) => Cow::Borrowed(name),
            ValueType::List(element) => Cow::Owned(format!("list<{}>", element.name())),
            ValueType::Map(element) => Cow::Owned(format!("map<{}>", element.name())),
        }
    }

    /// The object type this type refers to, looking through one level of
    /// list or map.
    pub fn object_name(&self) -> Option<&'static str> {
        match self {
            ValueType::Object(name) => Some(*name),
            ValueType::List(element) | ValueType::Map(element) => match **element {
                ValueType::Object(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
