use jm_utils::hash::{HashMap, HashSet};

use crate::ConfigError;
use crate::def::TypeDef;
use crate::info::{DiscriminatorInfo, KeyTarget, ReferenceRole, TypeInfo, UnwrapSpec};
use crate::registry::SubtypeTable;
use crate::value::ValueType;

/// Cross-type checks and derived state.
///
/// Returns the variant tables of every polymorphic base.
pub(crate) fn link(
    types: &mut HashMap<&'static str, TypeInfo>,
    defs: &[TypeDef],
) -> Result<HashMap<&'static str, SubtypeTable>, ConfigError> {
    check_references(types)?;
    mark_elided(types);
    let subtypes = build_families(types, defs)?;
    check_unwrap(types, &subtypes)?;
    check_managed_references(types)?;
    Ok(subtypes)
}

fn check_references(types: &HashMap<&'static str, TypeInfo>) -> Result<(), ConfigError> {
    for info in types.values() {
        let declared = info
            .properties
            .iter()
            .map(|p| &p.value_type)
            .chain(info.creator.iter().flat_map(|c| c.args().iter().map(|a| a.value_type())))
            .chain(info.fields.iter().map(|(_, ty)| ty));

        for value_type in declared {
            if let Some(name) = value_type.object_name()
                && !types.contains_key(name)
            {
                return Err(ConfigError::UnknownType {
                    owner: info.name,
                    name,
                });
            }
        }
    }
    Ok(())
}

fn mark_elided(types: &mut HashMap<&'static str, TypeInfo>) {
    let opaque: HashSet<&'static str> = types
        .values()
        .filter(|info| info.opaque)
        .map(|info| info.name)
        .collect();
    if opaque.is_empty() {
        return;
    }

    for info in types.values_mut() {
        for property in info.properties.iter_mut() {
            if let ValueType::Object(name) = property.value_type
                && opaque.contains(name)
            {
                property.elided = true;
            }
        }
    }
}

fn build_families(
    types: &mut HashMap<&'static str, TypeInfo>,
    defs: &[TypeDef],
) -> Result<HashMap<&'static str, SubtypeTable>, ConfigError> {
    let mut tables: HashMap<&'static str, SubtypeTable> = HashMap::default();
    let mut assigned: HashMap<&'static str, DiscriminatorInfo> = HashMap::default();

    for def in defs {
        let Some(property) = def.discriminator else {
            if !def.subtypes.is_empty() {
                return Err(ConfigError::MissingDiscriminator(def.name));
            }
            continue;
        };

        let mut table = SubtypeTable::new(def.name, property);
        for &(variant, type_name) in &def.subtypes {
            if !types.contains_key(type_name) {
                return Err(ConfigError::UnknownType {
                    owner: def.name,
                    name: type_name,
                });
            }
            table.register(variant, type_name)?;
        }
        // A base answers to its own name unless that tag is taken or it is
        // itself a variant of another family.
        let nested = defs.iter().any(|other| {
            other.name != def.name && other.subtypes.iter().any(|&(_, ty)| ty == def.name)
        });
        if !nested && table.variant_of(def.name).is_none() && !table.contains_variant(def.name) {
            table.register(def.name, def.name)?;
        }

        for (variant, type_name) in table.iter() {
            let info = DiscriminatorInfo::new(property.to_owned(), variant.to_owned());
            match assigned.get(type_name) {
                Some(previous) if previous != &info => {
                    return Err(ConfigError::ConflictingVariant {
                        type_name,
                        first: previous.variant().to_owned(),
                        second: variant.to_owned(),
                    });
                }
                Some(_) => {}
                None => {
                    assigned.insert(type_name, info);
                }
            }
        }
        tables.insert(def.name, table);
    }

    for (type_name, discriminator) in assigned {
        let Some(info) = types.get_mut(type_name) else { continue };
        if info.property(discriminator.property()).is_none() {
            info.lookup
                .insert(discriminator.property().to_owned(), KeyTarget::Meta);
        }
        info.discriminator = Some(discriminator);
    }

    Ok(tables)
}

fn check_unwrap(
    types: &HashMap<&'static str, TypeInfo>,
    subtypes: &HashMap<&'static str, SubtypeTable>,
) -> Result<(), ConfigError> {
    for info in types.values() {
        let mut keys: HashSet<String> = info
            .properties
            .iter()
            .filter(|p| !p.ignored && p.unwrap.is_none())
            .map(|p| p.json_name.clone())
            .collect();

        for property in info.properties.iter().filter(|p| !p.ignored) {
            let Some(spec) = &property.unwrap else { continue };
            let mut visiting = vec![info.name];
            let mut produced = Vec::new();
            unwrapped_keys(
                types,
                subtypes,
                info.name,
                property.declared_name,
                &property.value_type,
                spec,
                &mut visiting,
                &mut produced,
            )?;
            for key in produced {
                if !keys.insert(key.clone()) {
                    return Err(ConfigError::UnwrapCollision {
                        owner: info.name,
                        property: property.declared_name,
                        key,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Collects the keys an unwrapped property writes into its parent.
fn unwrapped_keys(
    types: &HashMap<&'static str, TypeInfo>,
    subtypes: &HashMap<&'static str, SubtypeTable>,
    owner: &'static str,
    property: &'static str,
    value_type: &ValueType,
    spec: &UnwrapSpec,
    visiting: &mut Vec<&'static str>,
    out: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let unsupported = |reason| ConfigError::UnsupportedUnwrap {
        owner,
        property,
        reason,
    };

    let &ValueType::Object(name) = value_type else {
        return Err(unsupported("declared type is not an object"));
    };
    let Some(target) = types.get(name) else {
        return Err(ConfigError::UnknownType { owner, name });
    };

    if visiting.contains(&name) {
        return Err(unsupported("type unwraps itself"));
    }
    if target.identity.is_some() {
        return Err(unsupported("type has an identity"));
    }
    if target.discriminator.is_some() || subtypes.contains_key(name) {
        return Err(unsupported("type is polymorphic"));
    }
    if target.creator.is_some() {
        return Err(unsupported("type has a creator"));
    }
    if target.any_setter.is_some() {
        return Err(unsupported("type has an any-setter"));
    }
    if target.serializer.is_some()
        || target.deserializer.is_some()
        || target.value_accessor.is_some()
    {
        return Err(unsupported("type is converted as a whole"));
    }

    visiting.push(name);
    for nested in target.properties.iter().filter(|p| !p.ignored) {
        match &nested.unwrap {
            Some(inner) => unwrapped_keys(
                types,
                subtypes,
                target.name,
                nested.declared_name,
                &nested.value_type,
                &inner.within(spec),
                visiting,
                out,
            )?,
            None => out.push(spec.key(&nested.json_name)),
        }
    }
    visiting.pop();
    Ok(())
}

fn check_managed_references(types: &HashMap<&'static str, TypeInfo>) -> Result<(), ConfigError> {
    for info in types.values() {
        for property in info.properties.iter() {
            let Some(&ReferenceRole::Managed(link)) = property.reference.as_ref() else { continue };
            let Some(target) = property.value_type.object_name() else {
                return Err(ConfigError::UnmatchedReference {
                    owner: info.name,
                    target: "<none>",
                    name: link,
                });
            };
            let matched = types
                .get(target)
                .is_some_and(|child| child.back_reference(link).is_some());
            if !matched {
                return Err(ConfigError::UnmatchedReference {
                    owner: info.name,
                    target,
                    name: link,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::ConfigError;
    use crate::def::{CreatorDef, MemberDef, TypeDef};
    use crate::info::{CreatorArg, CreatorArgs};
    use crate::registry::TypeRegistry;
    use crate::serde::HookError;
    use crate::value::{Value, ValueType};

    fn build(defs: Vec<TypeDef>) -> Result<TypeRegistry, ConfigError> {
        let mut builder = TypeRegistry::builder();
        for def in defs {
            builder.register(def);
        }
        builder.build()
    }

    fn money() -> TypeDef {
        TypeDef::new("Money")
            .field("amount", ValueType::Float)
            .field("currency", ValueType::String)
    }

    fn make(_: &CreatorArgs) -> Result<Value, HookError> {
        Ok(Value::Null)
    }

    #[test]
    fn unknown_property_type() {
        let err = build(vec![
            TypeDef::new("Order").field("total", ValueType::Object("Money")),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::UnknownType { owner: "Order", name: "Money" });
    }

    #[test]
    fn opaque_types_are_elided() {
        let registry = build(vec![
            TypeDef::new("Name").field("first", ValueType::String).opaque(),
            TypeDef::new("User")
                .field("id", ValueType::Int)
                .field("name", ValueType::Object("Name")),
        ])
        .unwrap();
        let user = registry.get("User").unwrap();
        assert!(user.property("name").unwrap().is_elided());
        assert!(!user.property("id").unwrap().is_elided());
    }

    #[test]
    fn unwrap_collisions() {
        let err = build(vec![
            money(),
            TypeDef::new("Order")
                .field("currency", ValueType::String)
                .member(MemberDef::field("total", ValueType::Object("Money")).unwrap()),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnwrapCollision {
                owner: "Order",
                property: "total",
                key: "currency".into()
            }
        );

        // A prefix keeps the keys apart.
        build(vec![
            money(),
            TypeDef::new("Order")
                .field("currency", ValueType::String)
                .member(
                    MemberDef::field("total", ValueType::Object("Money")).unwrap_with("total_", ""),
                ),
        ])
        .unwrap();
    }

    #[test]
    fn unsupported_unwrap() {
        let err = build(vec![
            money().creator(
                CreatorDef::properties(make).arg(CreatorArg::new("amount", ValueType::Float)),
            ),
            TypeDef::new("Order")
                .member(MemberDef::field("total", ValueType::Object("Money")).unwrap()),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedUnwrap { reason: "type has a creator", .. }));

        let err = build(vec![
            TypeDef::new("Order").member(MemberDef::field("total", ValueType::Float).unwrap()),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedUnwrap { property: "total", .. }));
    }

    #[test]
    fn families() {
        let registry = build(vec![
            TypeDef::new("Animal")
                .field("name", ValueType::String)
                .discriminator("type")
                .subtype("dog", "Dog")
                .subtype("cat", "Cat"),
            TypeDef::new("Dog").extends("Animal").field("barkVolume", ValueType::Float),
            TypeDef::new("Cat").extends("Animal").field("lives", ValueType::Int),
        ])
        .unwrap();

        let cat = registry.get("Cat").unwrap();
        let tag = cat.discriminator().unwrap();
        assert_eq!((tag.property(), tag.variant()), ("type", "cat"));
        assert_eq!(registry.variant_of("Animal", "Animal"), Some("Animal"));

        let err = build(vec![
            TypeDef::new("Animal")
                .discriminator("type")
                .subtype("dog", "Dog")
                .subtype("dog", "Cat"),
            TypeDef::new("Dog"),
            TypeDef::new("Cat"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::AmbiguousDiscriminator { base: "Animal", .. }));

        let err = build(vec![
            TypeDef::new("Animal").subtype("dog", "Dog"),
            TypeDef::new("Dog"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingDiscriminator("Animal"));
    }

    #[test]
    fn conflicting_families() {
        let err = build(vec![
            TypeDef::new("Pet").discriminator("type").subtype("dog", "Dog"),
            TypeDef::new("Animal").discriminator("type").subtype("canine", "Dog"),
            TypeDef::new("Dog"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingVariant { type_name: "Dog", .. }));
    }

    #[test]
    fn unmatched_managed_reference() {
        let err = build(vec![
            TypeDef::new("User").member(
                MemberDef::field("items", ValueType::list(ValueType::Object("Item")))
                    .managed_reference("owner"),
            ),
            TypeDef::new("Item").field("owner", ValueType::Object("User")),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnmatchedReference {
                owner: "User",
                target: "Item",
                name: "owner"
            }
        );
    }
}
