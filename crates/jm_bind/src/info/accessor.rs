use core::fmt;
use std::collections::BTreeMap;

use crate::value::{Object, Value};

/// Reads a property value out of an object.
pub type Getter = fn(&Object) -> Value;
/// Writes a property value into an object.
pub type Setter = fn(&mut Object, Value);
/// Returns the extra entries merged into the emitted object.
pub type AnyGetter = fn(&Object) -> BTreeMap<String, Value>;
/// Receives one unmatched input entry.
pub type AnySetter = fn(&mut Object, String, Value);

/// A field of the object, or a method.
///
/// Field accessors read and write the named field of [`Object`] directly; a
/// catch-all field holds a [`Value::Map`].
#[derive(Clone, Copy)]
pub enum AccessorRef<F> {
    Field(&'static str),
    Method(F),
}

impl<F> AccessorRef<F> {
    #[inline]
    pub const fn field_name(&self) -> Option<&'static str> {
        match self {
            AccessorRef::Field(name) => Some(*name),
            AccessorRef::Method(_) => None,
        }
    }
}

impl<F> fmt::Debug for AccessorRef<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorRef::Field(name) => write!(f, "Field({name})"),
            AccessorRef::Method(_) => f.write_str("Method(..)"),
        }
    }
}

impl AccessorRef<Getter> {
    /// `None` when the field is not set on the object.
    #[inline]
    pub fn read(&self, object: &Object) -> Option<Value> {
        match self {
            AccessorRef::Field(name) => object.get(name).cloned(),
            AccessorRef::Method(getter) => Some(getter(object)),
        }
    }
}

impl AccessorRef<Setter> {
    #[inline]
    pub fn write(&self, object: &mut Object, value: Value) {
        match self {
            AccessorRef::Field(name) => {
                object.set(name, value);
            }
            AccessorRef::Method(setter) => setter(object, value),
        }
    }
}

impl AccessorRef<AnyGetter> {
    pub fn entries(&self, object: &Object) -> BTreeMap<String, Value> {
        match self {
            AccessorRef::Field(name) => match object.get(name) {
                Some(Value::Map(entries)) => entries.clone(),
                _ => BTreeMap::new(),
            },
            AccessorRef::Method(getter) => getter(object),
        }
    }
}

impl AccessorRef<AnySetter> {
    pub fn insert(&self, object: &mut Object, key: String, value: Value) {
        match self {
            AccessorRef::Field(name) => match object.get_mut(name) {
                Some(Value::Map(entries)) => {
                    entries.insert(key, value);
                }
                _ => {
                    object.set(name, Value::Map(BTreeMap::from([(key, value)])));
                }
            },
            AccessorRef::Method(setter) => setter(object, key, value),
        }
    }
}
