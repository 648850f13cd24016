use std::collections::BTreeMap;

use jm_utils::hash::{HashMap, HashSet};
use serde_json::{Map, Value as JsonValue};

use super::InjectableValues;
use super::scalar::{coerce, json_kind, natural};

use crate::info::{CreatorArgs, CreatorMode, PropertyInfo, ReferenceRole, TypeInfo, UnwrapSpec};
use crate::registry::TypeRegistry;
use crate::serde::{DeserializeHook, IdentityRegistry, NamedHook, PropertyPath, TypeStack};
use crate::value::{IdentityKey, Object, ObjectRef, Value, ValueType};
use crate::{MapError, MapperConfig, UnknownProperties};

type JsonMap = Map<String, JsonValue>;

/// An identity-bearing node not materialized yet.
pub(super) struct Pending<'a> {
    pub node: &'a JsonMap,
    pub info: &'a TypeInfo,
}

/// Builds [`Value`]s from a JSON node tree.
///
/// One materializer serves one top-level call: it owns the identity
/// registry and the index of pending identity nodes.
pub(super) struct Materializer<'a> {
    pub(super) registry: &'a TypeRegistry,
    config: &'a MapperConfig,
    injectables: Option<&'a InjectableValues>,
    identities: IdentityRegistry,
    pub(super) index: HashMap<IdentityKey, Pending<'a>>,
    pub(super) path: PropertyPath,
    pub(super) stack: TypeStack,
}

impl<'a> Materializer<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        config: &'a MapperConfig,
        injectables: Option<&'a InjectableValues>,
    ) -> Self {
        Self {
            registry,
            config,
            injectables,
            identities: IdentityRegistry::new(),
            index: HashMap::default(),
            path: PropertyPath::root(),
            stack: TypeStack::new(),
        }
    }

    /// Indexes, then materializes `node` as `ty`.
    pub fn run(&mut self, node: &'a JsonValue, ty: &ValueType) -> Result<Value, MapError> {
        self.index(node, ty)?;
        self.materialize(node, ty)
    }

    // -------------------------------------------------------------------------
    // Dispatch

    fn materialize(&mut self, node: &'a JsonValue, ty: &ValueType) -> Result<Value, MapError> {
        match ty {
            ValueType::Any => Ok(natural(node)),
            ValueType::Object(name) => self.materialize_object(node, *name),
            ValueType::List(inner) => match node {
                JsonValue::Null => Ok(Value::Null),
                JsonValue::Array(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        self.path.push_index(index);
                        values.push(self.materialize(item, inner)?);
                        self.path.pop();
                    }
                    Ok(Value::List(values))
                }
                other => Err(self.mismatch(ty, other)),
            },
            ValueType::Map(inner) => match node {
                JsonValue::Null => Ok(Value::Null),
                JsonValue::Object(entries) => {
                    let mut values = BTreeMap::new();
                    for (key, child) in entries {
                        self.path.push_key(key);
                        values.insert(key.clone(), self.materialize(child, inner)?);
                        self.path.pop();
                    }
                    Ok(Value::Map(values))
                }
                other => Err(self.mismatch(ty, other)),
            },
            scalar => match coerce(node, scalar) {
                Ok(Some(value)) => Ok(value),
                Ok(None) => Err(self.mismatch(ty, node)),
                Err(source) => Err(MapError::FormatParse {
                    path: self.path.clone(),
                    source,
                }),
            },
        }
    }

    fn materialize_object(
        &mut self,
        node: &'a JsonValue,
        name: &'static str,
    ) -> Result<Value, MapError> {
        let entries = match node {
            JsonValue::Null => return Ok(Value::Null),
            JsonValue::Object(entries) => entries,
            other => return self.materialize_scalar_object(other, name),
        };

        let info = self.concrete(name, entries)?;

        if let Some(hook) = &info.deserializer {
            return self.call_hook(hook, node, info.name());
        }

        self.enter(info.name())?;
        let value = self.build_object(entries, info)?;
        self.leave();
        Ok(value)
    }

    /// A non-object node where an object type is expected: a hook input, a
    /// delegating creator argument, or an identity reference.
    fn materialize_scalar_object(
        &mut self,
        node: &'a JsonValue,
        name: &'static str,
    ) -> Result<Value, MapError> {
        let expected = ValueType::Object(name);
        let info = self.info(name)?;

        if let Some(hook) = &info.deserializer {
            return self.call_hook(hook, node, info.name());
        }

        if let Some(creator) = info.creator()
            && creator.mode() == CreatorMode::SingleArg
            && let [arg] = creator.args()
        {
            let value = self.materialize(node, arg.value_type())?;
            let mut args = CreatorArgs::with_capacity(1);
            args.push(arg.name(), value);
            return creator.call(&args).map_err(|source| MapError::CustomHook {
                target: format!("{} creator", info.name()),
                path: self.path.clone(),
                source,
            });
        }

        if self.registry.accepts_references(name)
            && let Some(key) = IdentityKey::from_json(node)
        {
            return self.resolve_reference(key);
        }

        Err(self.mismatch(&expected, node))
    }

    /// The concrete descriptor for an object node, following the
    /// discriminator of polymorphic bases.
    pub(super) fn concrete(
        &self,
        name: &'static str,
        entries: &JsonMap,
    ) -> Result<&'a TypeInfo, MapError> {
        let Some(table) = self.registry.subtypes(name) else {
            return self.info(name);
        };

        let variant = match entries.get(table.property()) {
            None | Some(JsonValue::Null) => {
                return Err(MapError::MissingDiscriminator {
                    base: table.base(),
                    property: table.property().to_owned(),
                    path: self.path.clone(),
                });
            }
            Some(JsonValue::String(tag)) => tag.clone(),
            Some(other) => other.to_string(),
        };

        match table.resolve(&variant) {
            Some(type_name) => self.info(type_name),
            None => Err(MapError::UnknownSubtype {
                base: table.base(),
                variant,
                path: self.path.clone(),
            }),
        }
    }

    fn resolve_reference(&mut self, key: IdentityKey) -> Result<Value, MapError> {
        if let Some(object) = self.identities.lookup(&key) {
            log::trace!("resolved identity {key} to a `{}`", object.type_name());
            return Ok(Value::Object(object.clone()));
        }

        if let Some(pending) = self.index.remove(&key) {
            log::trace!("materializing forward reference {key}");
            self.enter(pending.info.name())?;
            let value = self.build_object(pending.node, pending.info)?;
            self.leave();
            return Ok(value);
        }

        Err(MapError::UnresolvedReference {
            key,
            path: self.path.clone(),
        })
    }

    // -------------------------------------------------------------------------
    // Objects

    fn build_object(
        &mut self,
        entries: &'a JsonMap,
        info: &'a TypeInfo,
    ) -> Result<Value, MapError> {
        let mut consumed: HashSet<&'a str> = HashSet::default();

        if let Some(tag) = info.discriminator() {
            consume(entries, tag.property(), &mut consumed);
        }

        let mut key = None;
        if let Some(identity) = info.identity() {
            consume(entries, identity.property(), &mut consumed);
            key = entries.get(identity.property()).and_then(IdentityKey::from_json);
        }

        if let Some(key) = &key {
            if let Some(existing) = self.identities.lookup(key) {
                return Ok(Value::Object(existing.clone()));
            }
            self.index.remove(key);
        }

        // Registered before any property is read, so that nested references
        // to this instance resolve to it.
        let target = ObjectRef::new(info.instantiate());
        if let Some(key) = key {
            self.identities.record(key, target.clone());
        }

        if let Some(creator) = info.creator() {
            let mut args = CreatorArgs::with_capacity(creator.args().len());
            for arg in creator.args() {
                let value = match consume(entries, arg.name(), &mut consumed) {
                    Some(node) => {
                        self.path.push_key(arg.name());
                        let value = self.materialize(node, arg.value_type())?;
                        self.path.pop();
                        value
                    }
                    None => match arg.injection_key() {
                        Some(key) => self.injected(&key)?,
                        None if arg.is_required() => {
                            return Err(MapError::MissingArgument {
                                type_name: info.name(),
                                argument: arg.name(),
                                path: self.path.clone(),
                            });
                        }
                        None => arg.value_type().default_value(),
                    },
                };
                args.push(arg.name(), value);
            }

            let created = creator.call(&args).map_err(|source| MapError::CustomHook {
                target: format!("{} creator", info.name()),
                path: self.path.clone(),
                source,
            })?;

            match created {
                Value::Object(result) => {
                    if !result.ptr_eq(&target) {
                        let object = result.replace(Object::new(info.name()));
                        target.replace(object);
                    }
                }
                other => {
                    self.check_leftovers(entries, info, None, &consumed)?;
                    return Ok(other);
                }
            }
        }

        for property in info.properties() {
            if let Some(key) = property.inject_key()
                && !info.creator().is_some_and(|c| c.binds(property.json_name()))
            {
                let value = self.injected(key)?;
                property.write(&mut target.borrow_mut(), value);
            }
        }

        for property in info.properties() {
            if info.creator().is_some_and(|c| c.binds(property.json_name())) {
                continue;
            }
            let spec = UnwrapSpec::default();
            self.bind_property(entries, info, property, &target, &spec, &mut consumed)?;
        }

        self.check_leftovers(entries, info, Some(&target), &consumed)?;
        Ok(Value::Object(target))
    }

    fn bind_property(
        &mut self,
        entries: &'a JsonMap,
        owner: &'a TypeInfo,
        property: &'a PropertyInfo,
        target: &ObjectRef,
        spec: &UnwrapSpec,
        consumed: &mut HashSet<&'a str>,
    ) -> Result<(), MapError> {
        if property.is_ignored() {
            for name in property.names() {
                consume(entries, &spec.key(name), consumed);
            }
            return Ok(());
        }

        if let Some(inner) = property.unwrap_spec() {
            let child_info = property
                .value_type()
                .object_name()
                .and_then(|n| self.registry.get(n));
            let Some(child_info) = child_info else {
                return Ok(());
            };
            let spec = inner.within(spec);
            let child = ObjectRef::new(child_info.instantiate());
            for nested in child_info.properties() {
                self.bind_property(entries, child_info, nested, &child, &spec, consumed)?;
            }
            property.write(&mut target.borrow_mut(), Value::Object(child));
            return Ok(());
        }

        // Every name is consumed; the first present one is bound.
        let mut found = None;
        for name in owner.input_names(property) {
            if let Some((key, node)) = entries.get_key_value(&spec.key(name)) {
                consumed.insert(key.as_str());
                if found.is_none() {
                    found = Some((key, node));
                }
            }
        }
        let Some((key, node)) = found else {
            return Ok(());
        };

        if property.is_elided() {
            property.write(&mut target.borrow_mut(), Value::Null);
            return Ok(());
        }
        if property.is_back_reference() || !property.is_writable() {
            return Ok(());
        }

        self.path.push_key(key);
        let value = self.property_value(owner, property, node)?;
        self.path.pop();

        if let Some(ReferenceRole::Managed(link)) = property.reference() {
            self.link_back_references(&value, link, target);
        }
        property.write(&mut target.borrow_mut(), value);
        Ok(())
    }

    fn property_value(
        &mut self,
        owner: &TypeInfo,
        property: &PropertyInfo,
        node: &'a JsonValue,
    ) -> Result<Value, MapError> {
        if let Some(hook) = &property.deserializer {
            return hook.deserialize(node).map_err(|source| MapError::CustomHook {
                target: format!("{}.{}", owner.name(), property.json_name()),
                path: self.path.clone(),
                source,
            });
        }

        if let Some(pattern) = property.format()
            && let JsonValue::String(text) = node
        {
            return pattern
                .parse(text)
                .map(Value::DateTime)
                .map_err(|source| MapError::FormatParse {
                    path: self.path.clone(),
                    source,
                });
        }

        self.materialize(node, property.value_type())
    }

    /// Points the back-reference property of each child at `parent`.
    fn link_back_references(&self, value: &Value, link: &str, parent: &ObjectRef) {
        let children: Vec<&ObjectRef> = match value {
            Value::Object(child) => vec![child],
            Value::List(items) => items.iter().filter_map(Value::as_object).collect(),
            Value::Map(entries) => entries.values().filter_map(Value::as_object).collect(),
            _ => Vec::new(),
        };

        for child in children {
            let Some(back) = self
                .registry
                .get(child.type_name())
                .and_then(|info| info.back_reference(link))
            else {
                continue;
            };

            let mut object = child.borrow_mut();
            let parent = Value::Object(parent.clone());
            if let ValueType::List(_) = back.value_type() {
                let mut list = match back.read(&object) {
                    Value::List(list) => list,
                    _ => Vec::new(),
                };
                list.push(parent);
                back.write(&mut object, Value::List(list));
            } else {
                back.write(&mut object, parent);
            }
        }
    }

    /// Routes keys no property claimed.
    fn check_leftovers(
        &self,
        entries: &'a JsonMap,
        info: &TypeInfo,
        target: Option<&ObjectRef>,
        consumed: &HashSet<&'a str>,
    ) -> Result<(), MapError> {
        for (key, node) in entries {
            if consumed.contains(key.as_str()) || info.key_target(key).is_some() {
                continue;
            }

            if let (Some(any_setter), Some(target)) = (info.any_setter(), target) {
                any_setter.insert(&mut target.borrow_mut(), key.clone(), natural(node));
                continue;
            }

            if info.ignores_unknown()
                || self.config.unknown_properties == UnknownProperties::Ignore
            {
                log::debug!(
                    "discarding unknown property `{key}` of `{}` at {}",
                    info.name(),
                    self.path
                );
                continue;
            }

            return Err(MapError::UnknownProperty {
                type_name: info.name(),
                property: key.clone(),
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Helpers

    fn info(&self, name: &str) -> Result<&'a TypeInfo, MapError> {
        self.registry.get(name).ok_or_else(|| MapError::UnknownType {
            type_name: name.to_owned(),
            path: self.path.clone(),
        })
    }

    fn injected(&self, key: &str) -> Result<Value, MapError> {
        self.injectables
            .and_then(|values| values.get(key))
            .cloned()
            .ok_or_else(|| MapError::MissingInjectable {
                key: key.to_owned(),
                path: self.path.clone(),
            })
    }

    fn call_hook(
        &self,
        hook: &NamedHook<dyn DeserializeHook>,
        node: &JsonValue,
        type_name: &'static str,
    ) -> Result<Value, MapError> {
        hook.deserialize(node).map_err(|source| MapError::CustomHook {
            target: type_name.to_owned(),
            path: self.path.clone(),
            source,
        })
    }

    fn mismatch(&self, expected: &ValueType, node: &JsonValue) -> MapError {
        MapError::MismatchedType {
            expected: expected.name().into_owned(),
            found: json_kind(node),
            path: self.path.clone(),
        }
    }

    fn enter(&mut self, type_name: &'static str) -> Result<(), MapError> {
        if self.stack.depth() >= self.config.max_depth {
            return Err(MapError::CyclicReference {
                type_name,
                depth: self.config.max_depth,
                path: self.path.clone(),
            });
        }
        self.stack.push(type_name);
        Ok(())
    }

    #[inline]
    fn leave(&mut self) {
        self.stack.pop();
    }
}

/// Marks `key` as consumed and returns its node.
fn consume<'a>(
    entries: &'a JsonMap,
    key: &str,
    consumed: &mut HashSet<&'a str>,
) -> Option<&'a JsonValue> {
    let (key, node) = entries.get_key_value(key)?;
    consumed.insert(key.as_str());
    Some(node)
}
