use serde_json::{Map, Value as JsonValue};

use super::materializer::{Materializer, Pending};

use crate::MapError;
use crate::info::{TypeInfo, UnwrapSpec};
use crate::value::{IdentityKey, ValueType};

impl<'a> Materializer<'a> {
    /// Records every identity-bearing object node reachable from `node`.
    ///
    /// The walk follows declared types, so only nodes that will be read as an
    /// identity type are indexed. Nodes handed to hooks are opaque.
    pub(super) fn index(&mut self, node: &'a JsonValue, ty: &ValueType) -> Result<(), MapError> {
        match (ty, node) {
            (ValueType::List(inner), JsonValue::Array(items)) => {
                for item in items {
                    self.index(item, inner)?;
                }
                Ok(())
            }
            (ValueType::Map(inner), JsonValue::Object(entries)) => {
                for child in entries.values() {
                    self.index(child, inner)?;
                }
                Ok(())
            }
            (ValueType::Object(name), JsonValue::Object(entries)) => {
                // Unresolvable nodes are reported by the materializing pass.
                match self.concrete(*name, entries) {
                    Ok(info) => self.index_object(entries, info),
                    Err(_) => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    fn index_object(
        &mut self,
        entries: &'a Map<String, JsonValue>,
        info: &'a TypeInfo,
    ) -> Result<(), MapError> {
        if info.deserializer.is_some() {
            return Ok(());
        }

        if let Some(identity) = info.identity()
            && let Some(key) = entries.get(identity.property()).and_then(IdentityKey::from_json)
        {
            let pending = Pending {
                node: entries,
                info,
            };
            if self.index.insert(key.clone(), pending).is_some() {
                return Err(MapError::DuplicateIdentity { key });
            }
        }

        if let Some(creator) = info.creator() {
            for arg in creator.args() {
                if let Some(child) = entries.get(arg.name()) {
                    self.index(child, arg.value_type())?;
                }
            }
        }

        self.index_properties(entries, info, &UnwrapSpec::default())
    }

    fn index_properties(
        &mut self,
        entries: &'a Map<String, JsonValue>,
        info: &'a TypeInfo,
        spec: &UnwrapSpec,
    ) -> Result<(), MapError> {
        let creator = info.creator();

        for property in info.properties() {
            if property.is_ignored()
                || property.is_elided()
                || property.deserializer.is_some()
                || creator.is_some_and(|c| c.binds(property.json_name()))
            {
                continue;
            }

            if let Some(inner) = property.unwrap_spec() {
                let child = property
                    .value_type()
                    .object_name()
                    .and_then(|n| self.registry.get(n));
                if let Some(child) = child {
                    self.index_properties(entries, child, &inner.within(spec))?;
                }
                continue;
            }

            let first = info
                .input_names(property)
                .find_map(|name| entries.get(&spec.key(name)));
            if let Some(child) = first {
                self.index(child, property.value_type())?;
            }
        }
        Ok(())
    }
}
