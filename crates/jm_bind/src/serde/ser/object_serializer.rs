use serde_core::ser::SerializeMap;
use serde_core::{Serialize, Serializer};

use jm_utils::hash::HashSet;

use super::state::SerializeState;
use super::value_serializer::ValueSerializer;

use crate::MapError;
use crate::format::FormatError;
use crate::info::{IdentityGenerator, PropertyInfo, TypeInfo, UnwrapSpec};
use crate::value::{IdentityKey, Object, ObjectRef, Value};

/// Writes one object through its descriptor.
pub(super) struct ObjectSerializer<'a> {
    pub object: &'a ObjectRef,
    pub state: &'a SerializeState<'a>,
}

impl Serialize for ObjectSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let info = self.state.info(self.object.type_name())?;

        self.state.enter(info.name())?;
        let output = self.serialize_with(info, serializer);
        self.state.leave();

        output
    }
}

impl ObjectSerializer<'_> {
    fn serialize_with<S: Serializer>(
        &self,
        info: &TypeInfo,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let state = self.state;

        if let Some(hook) = &info.serializer {
            let node = hook
                .serialize(&Value::Object(self.object.clone()))
                .map_err(|source| {
                    state.fail::<S::Error>(MapError::CustomHook {
                        target: info.name().to_owned(),
                        path: state.path(),
                        source,
                    })
                })?;
            return node.serialize(serializer);
        }

        if let Some(accessor) = &info.value_accessor {
            let value = accessor.read(&self.object.borrow()).unwrap_or_default();
            return ValueSerializer {
                value: &value,
                state,
            }
            .serialize(serializer);
        }

        let mut generated = None;
        if let Some(identity) = &info.identity {
            let emitted = state.identities.borrow().emitted(self.object).cloned();
            if let Some(key) = emitted {
                log::trace!("`{}` already written, emitting identity {key}", info.name());
                return key.serialize(serializer);
            }

            let key = match identity.generator() {
                IdentityGenerator::Property => {
                    let value = info
                        .property(identity.property())
                        .map(|property| property.read(&self.object.borrow()))
                        .unwrap_or_default();
                    IdentityKey::from_value(&value).ok_or_else(|| {
                        state.fail::<S::Error>(MapError::InvalidIdentity {
                            type_name: info.name(),
                            path: state.path(),
                        })
                    })?
                }
                IdentityGenerator::Sequence => {
                    let key = state.identities.borrow_mut().next_sequence();
                    generated = Some(key.clone());
                    key
                }
            };
            state.identities.borrow_mut().mark_emitted(self.object, key);
        }

        let object = self.object.borrow();
        let mut map = serializer.serialize_map(None)?;

        if let (Some(identity), Some(key)) = (&info.identity, &generated) {
            map.serialize_entry(identity.property(), key)?;
        }
        if let Some(tag) = &info.discriminator {
            map.serialize_entry(tag.property(), tag.variant())?;
        }

        let mut written = HashSet::default();
        self.write_properties(&mut map, info, &object, &UnwrapSpec::default(), &mut written)?;

        if let Some(any_getter) = &info.any_getter {
            for (key, value) in any_getter.entries(&object) {
                if written.contains(&key) {
                    log::warn!(
                        "any-getter of `{}` returned `{key}`, which shadows a property; entry skipped",
                        info.name()
                    );
                    continue;
                }
                state.path.borrow_mut().push_key(&key);
                map.serialize_entry(&key, &ValueSerializer {
                    value: &value,
                    state,
                })?;
                state.path.borrow_mut().pop();
            }
        }

        map.end()
    }

    /// Writes the properties of `object`, merging unwrapped children into the
    /// same map under their prefixed keys.
    fn write_properties<M: SerializeMap>(
        &self,
        map: &mut M,
        info: &TypeInfo,
        object: &Object,
        spec: &UnwrapSpec,
        written: &mut HashSet<String>,
    ) -> Result<(), M::Error> {
        let state = self.state;
        let tag = info.discriminator().map(|tag| tag.property());

        for property in info.properties() {
            if property.is_ignored()
                || property.is_elided()
                || property.is_back_reference()
                || !property.is_readable()
                || tag == Some(property.json_name())
            {
                continue;
            }

            let value = property.read(object);

            if let Some(inner) = property.unwrap_spec() {
                let Value::Object(child) = &value else { continue };
                let child_info = state.info(child.type_name())?;
                let child_object = child.borrow();
                let spec = inner.within(spec);
                self.write_properties(map, child_info, &child_object, &spec, written)?;
                continue;
            }

            if !property.inclusion().includes(&value) {
                continue;
            }

            let key = spec.key(property.json_name());
            state.path.borrow_mut().push_key(&key);
            self.write_property(map, info, property, &key, &value)?;
            state.path.borrow_mut().pop();
            written.insert(key);
        }
        Ok(())
    }

    fn write_property<M: SerializeMap>(
        &self,
        map: &mut M,
        info: &TypeInfo,
        property: &PropertyInfo,
        key: &str,
        value: &Value,
    ) -> Result<(), M::Error> {
        let state = self.state;

        if let Some(hook) = &property.serializer {
            let node = hook.serialize(value).map_err(|source| {
                state.fail::<M::Error>(MapError::CustomHook {
                    target: format!("{}.{}", info.name(), property.json_name()),
                    path: state.path(),
                    source,
                })
            })?;
            return map.serialize_entry(key, &node);
        }

        if let Some(pattern) = property.format() {
            return match value {
                Value::Null => map.serialize_entry(key, &()),
                Value::DateTime(date_time) => {
                    let text = pattern.format(date_time).map_err(|source| {
                        state.fail::<M::Error>(MapError::Format {
                            path: state.path(),
                            source,
                        })
                    })?;
                    map.serialize_entry(key, &text)
                }
                other => Err(state.fail(MapError::Format {
                    path: state.path(),
                    source: FormatError::NotTemporal {
                        pattern: pattern.as_str().to_owned(),
                        found: other.kind(),
                    },
                })),
            };
        }

        map.serialize_entry(key, &ValueSerializer { value, state })
    }
}
