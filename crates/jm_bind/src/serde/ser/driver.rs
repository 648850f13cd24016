use serde_core::ser::SerializeMap;
use serde_core::{Serialize, Serializer};

use super::state::SerializeState;
use super::value_serializer::ValueSerializer;

use crate::registry::TypeRegistry;
use crate::value::Value;
use crate::{MapError, MapperConfig};

static DEFAULT_CONFIG: MapperConfig = MapperConfig::new();

// -----------------------------------------------------------------------------
// SerializeDriver

/// Serializer for [`Value`]s driven by a [`TypeRegistry`].
///
/// Objects are written through the descriptor of their runtime type. See the
/// [module documentation](crate::serde) for the dispatch order.
///
/// Each call to `serialize` starts with a fresh identity registry, so the
/// same driver may be serialized more than once.
///
/// # Errors
///
/// A failure is reported to the serde format as a `custom` error. The typed
/// [`MapError`] stays available through [`take_error`](Self::take_error).
///
/// # Examples
///
/// ```
/// use jm_bind::def::TypeDef;
/// use jm_bind::registry::TypeRegistry;
/// use jm_bind::serde::SerializeDriver;
/// use jm_bind::value::{Object, Value, ValueType};
///
/// let mut builder = TypeRegistry::builder();
/// builder.register(TypeDef::new("Point").field("x", ValueType::Int).field("y", ValueType::Int));
/// let registry = builder.build().unwrap();
///
/// let point = Value::from(Object::new("Point").with("x", 1).with("y", 2));
/// let driver = SerializeDriver::new(&point, &registry);
///
/// assert_eq!(serde_json::to_string(&driver).unwrap(), r#"{"x":1,"y":2}"#);
/// ```
pub struct SerializeDriver<'a> {
    value: &'a Value,
    state: SerializeState<'a>,
}

impl<'a> SerializeDriver<'a> {
    /// Creates a driver with the default [`MapperConfig`].
    #[inline]
    pub fn new(value: &'a Value, registry: &'a TypeRegistry) -> Self {
        Self::with_config(value, registry, &DEFAULT_CONFIG)
    }

    #[inline]
    pub fn with_config(
        value: &'a Value,
        registry: &'a TypeRegistry,
        config: &'a MapperConfig,
    ) -> Self {
        Self {
            value,
            state: SerializeState::new(registry, config),
        }
    }

    /// The error of the last failed call, if any.
    #[inline]
    pub fn take_error(&self) -> Option<MapError> {
        self.state.take_error()
    }
}

impl Serialize for SerializeDriver<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let state = &self.state;
        state.reset();

        let root = ValueSerializer {
            value: self.value,
            state,
        };

        if state.config.wrap_root_value
            && let Value::Object(object) = self.value
        {
            let info = state.info::<S::Error>(object.type_name())?;
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(info.root_name(), &root)?;
            return map.end();
        }

        root.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::SerializeDriver;
    use crate::def::{MemberDef, TypeDef};
    use crate::info::{IdentityGenerator, Inclusion};
    use crate::registry::TypeRegistry;
    use crate::value::{Object, ObjectRef, Value, ValueType};
    use crate::{MapError, MapperConfig};

    fn registry(defs: Vec<TypeDef>) -> TypeRegistry {
        let mut builder = TypeRegistry::builder();
        for def in defs {
            builder.register(def);
        }
        builder.build().unwrap()
    }

    #[test]
    fn nested_values() {
        let registry = registry(vec![
            TypeDef::new("Tag").field("label", ValueType::String),
            TypeDef::new("Post")
                .field("title", ValueType::String)
                .field("tags", ValueType::list(ValueType::Object("Tag")))
                .member(MemberDef::field("draft", ValueType::Bool).include(Inclusion::NonNull)),
        ]);
        let post = Object::new("Post")
            .with("title", "hello")
            .with(
                "tags",
                vec![Value::from(Object::new("Tag").with("label", "rust"))],
            )
            .with("draft", Value::Null);
        let value = Value::from(post);

        let json = serde_json::to_value(SerializeDriver::new(&value, &registry)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": "hello", "tags": [{ "label": "rust" }] })
        );
    }

    #[test]
    fn sequence_identity_breaks_cycles() {
        let registry = registry(vec![
            TypeDef::new("Node")
                .field("name", ValueType::String)
                .field("next", ValueType::Object("Node"))
                .identity("@id", IdentityGenerator::Sequence),
        ]);
        let node = ObjectRef::new(Object::new("Node").with("name", "a"));
        node.borrow_mut().set("next", node.clone());
        let value = Value::from(node.clone());

        let text = serde_json::to_string(&SerializeDriver::new(&value, &registry)).unwrap();
        assert_eq!(text, r#"{"@id":1,"name":"a","next":1}"#);

        // Cut the cycle so the test does not leak.
        node.borrow_mut().set("next", Value::Null);
    }

    #[test]
    fn cycles_without_identity_fail() {
        let registry = registry(vec![
            TypeDef::new("Node").field("next", ValueType::Object("Node")),
        ]);
        let node = ObjectRef::new(Object::new("Node"));
        node.borrow_mut().set("next", node.clone());
        let value = Value::from(node.clone());

        let config = MapperConfig::new().with_max_depth(16);
        let driver = SerializeDriver::with_config(&value, &registry, &config);
        assert!(serde_json::to_string(&driver).is_err());
        assert!(matches!(
            driver.take_error(),
            Some(MapError::CyclicReference { type_name: "Node", depth: 16, .. })
        ));

        node.borrow_mut().set("next", Value::Null);
    }

    #[test]
    fn cycles_fail_within_the_default_depth() {
        let registry = registry(vec![
            TypeDef::new("Node").field("next", ValueType::Object("Node")),
        ]);
        let node = ObjectRef::new(Object::new("Node"));
        node.borrow_mut().set("next", node.clone());
        let value = Value::from(node.clone());

        // Runs on a test thread, so the default bound has to fit its stack.
        let driver = SerializeDriver::new(&value, &registry);
        assert!(serde_json::to_string(&driver).is_err());
        assert!(matches!(
            driver.take_error(),
            Some(MapError::CyclicReference { depth: MapperConfig::DEFAULT_MAX_DEPTH, .. })
        ));

        node.borrow_mut().set("next", Value::Null);
    }

    #[test]
    fn unknown_runtime_type() {
        let registry = registry(vec![]);
        let value = Value::from(Object::new("Ghost"));
        let driver = SerializeDriver::new(&value, &registry);

        assert!(serde_json::to_value(&driver).is_err());
        assert!(matches!(driver.take_error(), Some(MapError::UnknownType { .. })));
    }

    #[test]
    fn wrapped_root() {
        let registry = registry(vec![
            TypeDef::new("User").field("name", ValueType::String).root_name("user"),
        ]);
        let value = Value::from(Object::new("User").with("name", "ann"));
        let config = MapperConfig::new().with_wrap_root_value(true);

        let driver = SerializeDriver::with_config(&value, &registry, &config);
        let json = serde_json::to_value(&driver).unwrap();
        assert_eq!(json, serde_json::json!({ "user": { "name": "ann" } }));
    }
}
