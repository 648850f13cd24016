use serde_core::de::{DeserializeSeed, Error};
use serde_core::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use super::InjectableValues;
use super::materializer::Materializer;
use super::scalar::json_kind;

use crate::registry::TypeRegistry;
use crate::serde::{PropertyPath, TypeStack, describe};
use crate::value::{Value, ValueType};
use crate::{MapError, MapperConfig};

static DEFAULT_CONFIG: MapperConfig = MapperConfig::new();

// -----------------------------------------------------------------------------
// DeserializeDriver

/// Deserializer producing a [`Value`] of a declared [`ValueType`].
///
/// The input is first read into a `serde_json::Value` tree, so any serde
/// format can drive it. Identity references may point forward: every
/// identity-bearing node is indexed before materialization starts.
///
/// See the [module documentation](crate::serde) for the binding order.
///
/// # Examples
///
/// ```
/// use jm_bind::def::TypeDef;
/// use jm_bind::registry::TypeRegistry;
/// use jm_bind::serde::DeserializeDriver;
/// use jm_bind::value::{Value, ValueType};
/// use serde::de::DeserializeSeed;
///
/// let mut builder = TypeRegistry::builder();
/// builder.register(TypeDef::new("Point").field("x", ValueType::Int).field("y", ValueType::Int));
/// let registry = builder.build().unwrap();
///
/// let mut input = serde_json::Deserializer::from_str(r#"{"x":1,"y":"2"}"#);
/// let point = DeserializeDriver::new(&registry, ValueType::Object("Point"))
///     .deserialize(&mut input)
///     .unwrap();
///
/// let point = point.as_object().unwrap();
/// assert_eq!(point.get("y"), Some(Value::Int(2)));
/// ```
pub struct DeserializeDriver<'a> {
    registry: &'a TypeRegistry,
    value_type: ValueType,
    config: &'a MapperConfig,
    injectables: Option<&'a InjectableValues>,
}

impl<'a> DeserializeDriver<'a> {
    /// Creates a driver with the default [`MapperConfig`] and no injectable
    /// values.
    #[inline]
    pub fn new(registry: &'a TypeRegistry, value_type: ValueType) -> Self {
        Self {
            registry,
            value_type,
            config: &DEFAULT_CONFIG,
            injectables: None,
        }
    }

    #[inline]
    pub fn with_config(mut self, config: &'a MapperConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn with_injectables(mut self, injectables: &'a InjectableValues) -> Self {
        self.injectables = Some(injectables);
        self
    }

    #[inline]
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Materializes an already parsed node.
    pub fn read_node(&self, node: &JsonValue) -> Result<Value, MapError> {
        self.read_with(node, |error, _| error)
    }

    fn read_with<E>(
        &self,
        node: &JsonValue,
        on_error: impl FnOnce(MapError, &TypeStack) -> E,
    ) -> Result<Value, E> {
        let mut materializer = Materializer::new(self.registry, self.config, self.injectables);

        let result = match self.unwrap_root(node) {
            Ok(node) => materializer.run(node, &self.value_type),
            Err(error) => Err(error),
        };
        result.map_err(|error| on_error(error, &materializer.stack))
    }

    /// Strips the `{rootName: ...}` wrapper when root wrapping is enabled.
    fn unwrap_root<'n>(&self, node: &'n JsonValue) -> Result<&'n JsonValue, MapError> {
        if !self.config.wrap_root_value {
            return Ok(node);
        }
        let info = self
            .value_type
            .object_name()
            .and_then(|name| self.registry.get(name));
        let Some(info) = info else {
            return Ok(node);
        };

        let root = info.root_name();
        match node {
            JsonValue::Object(entries) => match entries.get(root) {
                Some(inner) if entries.len() == 1 => Ok(inner),
                _ => {
                    let property = entries
                        .keys()
                        .find(|key| *key != root)
                        .cloned()
                        .unwrap_or_default();
                    Err(MapError::UnknownProperty {
                        type_name: info.name(),
                        property,
                        path: PropertyPath::root(),
                    })
                }
            },
            other => Err(MapError::MismatchedType {
                expected: format!("object wrapped in `{root}`"),
                found: json_kind(other),
                path: PropertyPath::root(),
            }),
        }
    }
}

impl<'de> DeserializeSeed<'de> for DeserializeDriver<'_> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let node = JsonValue::deserialize(deserializer)?;
        self.read_with(&node, |error, stack| D::Error::custom(describe(&error, stack)))
    }
}
