use jm_utils::hash::HashMap;

use crate::ConfigError;
use crate::def::TypeDef;

/// Folds the base chain of `def` into a single definition.
///
/// Base members come first; a member of a derived type replaces the base
/// member of the same name and kind in place. Discovery thresholds,
/// inclusion, identity and catch-all accessors are inherited, ignore sets are
/// merged. Creators, hooks, discriminators and subtypes stay with the type
/// that declares them.
pub(crate) fn flatten(
    def: &TypeDef,
    defs: &HashMap<&'static str, &TypeDef>,
) -> Result<TypeDef, ConfigError> {
    let mut chain = vec![def];
    let mut current = def;
    while let Some(base) = current.extends {
        if chain.iter().any(|d| d.name == base) {
            return Err(ConfigError::InheritanceCycle(def.name));
        }
        let Some(&base_def) = defs.get(base) else {
            return Err(ConfigError::UnknownType {
                owner: current.name,
                name: base,
            });
        };
        chain.push(base_def);
        current = base_def;
    }

    if chain.len() == 1 {
        return Ok(def.clone());
    }

    let mut flat = TypeDef::new(def.name);
    for layer in chain.iter().rev() {
        for member in &layer.members {
            let slot = member.kind.slot();
            match flat
                .members
                .iter_mut()
                .find(|m| m.name == member.name && m.kind.slot() == slot)
            {
                Some(existing) => *existing = member.clone(),
                None => flat.members.push(member.clone()),
            }
        }

        if layer.auto_detect.is_some() {
            flat.auto_detect = layer.auto_detect;
        }
        if layer.inclusion.is_some() {
            flat.inclusion = layer.inclusion;
        }
        if !layer.order.is_empty() {
            flat.order = layer.order.clone();
        }
        flat.ignored.extend_from_slice(&layer.ignored);
        flat.ignore_unknown |= layer.ignore_unknown;
        if layer.identity.is_some() {
            flat.identity = layer.identity.clone();
        }
        if layer.any_getter.is_some() {
            flat.any_getter = layer.any_getter;
        }
        if layer.any_setter.is_some() {
            flat.any_setter = layer.any_setter;
        }
        if layer.duplicate_any.is_some() {
            flat.duplicate_any = layer.duplicate_any;
        }
    }

    flat.opaque = def.opaque;
    flat.creator = def.creator.clone();
    flat.discriminator = def.discriminator;
    flat.subtypes = def.subtypes.clone();
    flat.serialize_with = def.serialize_with;
    flat.deserialize_with = def.deserialize_with;
    flat.value_accessor = def.value_accessor;
    flat.root_name = def.root_name;
    Ok(flat)
}
