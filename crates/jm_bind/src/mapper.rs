use std::sync::Arc;

use serde::Deserialize;
use serde_core::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::MapError;
use crate::registry::TypeRegistry;
use crate::serde::{DeserializeDriver, InjectableValues, SerializeDriver};
use crate::value::{Value, ValueType};

// -----------------------------------------------------------------------------
// MapperConfig

/// What to do with input keys no property, creator argument or any-setter
/// claims.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownProperties {
    #[default]
    Fail,
    Ignore,
}

/// Per-mapper conversion settings.
///
/// Loadable from any serde format; missing keys take their defaults.
///
/// ```
/// use jm_bind::{MapperConfig, UnknownProperties};
///
/// let config: MapperConfig = serde_json::from_str(r#"{"unknown_properties":"ignore"}"#).unwrap();
/// assert_eq!(config.unknown_properties, UnknownProperties::Ignore);
/// assert_eq!(config.max_depth, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub unknown_properties: UnknownProperties,
    /// Deepest object nesting before a conversion is treated as cyclic.
    pub max_depth: usize,
    /// Wraps the root object as `{rootName: ...}` on output and expects the
    /// wrapper on input.
    pub wrap_root_value: bool,
}

impl MapperConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub const fn new() -> Self {
        Self {
            unknown_properties: UnknownProperties::Fail,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            wrap_root_value: false,
        }
    }

    #[inline]
    pub const fn with_unknown_properties(mut self, unknown_properties: UnknownProperties) -> Self {
        self.unknown_properties = unknown_properties;
        self
    }

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub const fn with_wrap_root_value(mut self, wrap_root_value: bool) -> Self {
        self.wrap_root_value = wrap_root_value;
        self
    }
}

impl Default for MapperConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Mapper

/// The conversion entry point: a shared registry plus a configuration.
///
/// Cheap to clone and `Send + Sync`; every call works on fresh scratch state.
///
/// # Examples
///
/// ```
/// use jm_bind::Mapper;
/// use jm_bind::def::{MemberDef, TypeDef};
/// use jm_bind::registry::TypeRegistry;
/// use jm_bind::value::{Object, Value, ValueType};
///
/// let mut builder = TypeRegistry::builder();
/// builder.register(
///     TypeDef::new("Person")
///         .member(MemberDef::field("first", ValueType::String).rename("firstName"))
///         .member(MemberDef::field("last", ValueType::String).rename("lastName")),
/// );
/// let mapper = Mapper::new(builder.build().unwrap());
///
/// let person = Value::from(Object::new("Person").with("first", "Ada").with("last", "Lovelace"));
/// let text = mapper.to_string(&person).unwrap();
/// assert_eq!(text, r#"{"firstName":"Ada","lastName":"Lovelace"}"#);
///
/// let back = mapper.reader_for("Person").read_str(&text).unwrap();
/// assert_eq!(back, person);
/// ```
#[derive(Clone, Debug)]
pub struct Mapper {
    registry: Arc<TypeRegistry>,
    config: MapperConfig,
}

impl Mapper {
    #[inline]
    pub fn new(registry: impl Into<Arc<TypeRegistry>>) -> Self {
        Self::with_config(registry, MapperConfig::new())
    }

    #[inline]
    pub fn with_config(registry: impl Into<Arc<TypeRegistry>>, config: MapperConfig) -> Self {
        Self {
            registry: registry.into(),
            config,
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// A `Serialize` view of `value`, for any serde format.
    #[inline]
    pub fn serializer<'a>(&'a self, value: &'a Value) -> SerializeDriver<'a> {
        SerializeDriver::with_config(value, &self.registry, &self.config)
    }

    /// Writes `value` with `serializer`.
    ///
    /// Failures surface as the format's `custom` error; use
    /// [`to_value`](Self::to_value) or [`to_string`](Self::to_string) for a
    /// typed [`MapError`].
    pub fn serialize<S: Serializer>(
        &self,
        value: &Value,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        self.serializer(value).serialize(serializer)
    }

    pub fn to_value(&self, value: &Value) -> Result<JsonValue, MapError> {
        let driver = self.serializer(value);
        serde_json::to_value(&driver)
            .map_err(|error| driver.take_error().unwrap_or(MapError::Json(error)))
    }

    pub fn to_string(&self, value: &Value) -> Result<String, MapError> {
        let driver = self.serializer(value);
        serde_json::to_string(&driver)
            .map_err(|error| driver.take_error().unwrap_or(MapError::Json(error)))
    }

    /// A reader producing instances of the named type.
    #[inline]
    pub fn reader_for(&self, type_name: &'static str) -> ValueReader<'_> {
        self.reader_for_type(ValueType::Object(type_name))
    }

    #[inline]
    pub fn reader_for_type(&self, value_type: ValueType) -> ValueReader<'_> {
        ValueReader {
            mapper: self,
            value_type,
            injectables: None,
        }
    }

    /// Reads a node with no declared type: objects become maps.
    pub fn read_value(&self, node: &JsonValue) -> Result<Value, MapError> {
        self.reader_for_type(ValueType::Any).read_value(node)
    }
}

// -----------------------------------------------------------------------------
// ValueReader

/// Reads input as one declared type.
pub struct ValueReader<'a> {
    mapper: &'a Mapper,
    value_type: ValueType,
    injectables: Option<&'a InjectableValues>,
}

impl<'a> ValueReader<'a> {
    #[inline]
    pub fn with_injectables(mut self, injectables: &'a InjectableValues) -> Self {
        self.injectables = Some(injectables);
        self
    }

    #[inline]
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn read_value(&self, node: &JsonValue) -> Result<Value, MapError> {
        self.seed().read_node(node)
    }

    pub fn read_str(&self, text: &str) -> Result<Value, MapError> {
        let node: JsonValue = serde_json::from_str(text)?;
        self.read_value(&node)
    }

    /// A `DeserializeSeed` for any serde format.
    pub fn seed(&self) -> DeserializeDriver<'a> {
        let driver = DeserializeDriver::new(&self.mapper.registry, self.value_type.clone())
            .with_config(&self.mapper.config);
        match self.injectables {
            Some(injectables) => driver.with_injectables(injectables),
            None => driver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Mapper, MapperConfig, UnknownProperties};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn mapper_is_shareable() {
        assert_send_sync::<Mapper>();
    }

    #[test]
    fn config_from_json() {
        let config: MapperConfig =
            serde_json::from_str(r#"{"max_depth":8,"wrap_root_value":true}"#).unwrap();
        assert_eq!(
            config,
            MapperConfig::new().with_max_depth(8).with_wrap_root_value(true)
        );
        assert_eq!(config.unknown_properties, UnknownProperties::Fail);
    }
}
