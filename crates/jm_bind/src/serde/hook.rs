use core::fmt;
use core::ops::Deref;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::value::Value;

/// The error a custom hook or creator reports.
pub type HookError = Box<dyn core::error::Error + Send + Sync>;

// -----------------------------------------------------------------------------
// Hooks

/// A custom converter from a value to JSON.
///
/// Registered by name on the
/// [`RegistryBuilder`](crate::registry::RegistryBuilder) and attached to a
/// type (`TypeDef::serialize_with`) or a property
/// (`MemberDef::serialize_with`). Its output is emitted verbatim.
///
/// Closures `Fn(&Value) -> Result<JsonValue, HookError>` implement this
/// trait.
pub trait SerializeHook: Send + Sync {
    fn serialize(&self, value: &Value) -> Result<JsonValue, HookError>;
}

/// A custom converter from JSON to a value.
///
/// Receives the whole JSON node of the type or property it is attached to.
pub trait DeserializeHook: Send + Sync {
    fn deserialize(&self, node: &JsonValue) -> Result<Value, HookError>;
}

impl<F> SerializeHook for F
where
    F: Fn(&Value) -> Result<JsonValue, HookError> + Send + Sync,
{
    #[inline]
    fn serialize(&self, value: &Value) -> Result<JsonValue, HookError> {
        self(value)
    }
}

impl<F> DeserializeHook for F
where
    F: Fn(&JsonValue) -> Result<Value, HookError> + Send + Sync,
{
    #[inline]
    fn deserialize(&self, node: &JsonValue) -> Result<Value, HookError> {
        self(node)
    }
}

// -----------------------------------------------------------------------------
// NamedHook

/// A shared hook together with the name it was registered under.
pub struct NamedHook<H: ?Sized> {
    name: &'static str,
    hook: Arc<H>,
}

impl<H: ?Sized> NamedHook<H> {
    #[inline]
    pub(crate) fn new(name: &'static str, hook: Arc<H>) -> Self {
        Self { name, hook }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<H: ?Sized> Clone for NamedHook<H> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<H: ?Sized> Deref for NamedHook<H> {
    type Target = H;

    #[inline]
    fn deref(&self) -> &H {
        &self.hook
    }
}

impl<H: ?Sized> fmt::Debug for NamedHook<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamedHook({})", self.name)
    }
}
