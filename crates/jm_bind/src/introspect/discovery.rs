use jm_utils::hash::HashMap;

use super::Context;
use crate::ConfigError;
use crate::def::{MemberDef, MemberKind, PropertyConfig, TypeDef};
use crate::format::DatePattern;
use crate::info::{AccessorRef, CreatorInfo, CreatorMode, IdentityGenerator, KeyTarget};
use crate::info::{PropertyInfo, TypeInfo, Visibility};
use crate::serde::NamedHook;
use crate::value::ValueType;

const FIELD: usize = 0;
const GETTER: usize = 1;
const SETTER: usize = 2;

// -----------------------------------------------------------------------------
// Candidate

/// The members sharing one name, before and after renaming.
struct Candidate<'d> {
    declared: &'static str,
    json_name: &'static str,
    first: usize,
    members: [Option<&'d MemberDef>; 3],
    visible: [bool; 3],
    ignored: bool,
}

impl<'d> Candidate<'d> {
    fn present(&self) -> impl Iterator<Item = &'d MemberDef> + '_ {
        self.members.iter().filter_map(|m| *m)
    }

    fn configs(&self) -> impl Iterator<Item = &'d PropertyConfig> + '_ {
        self.present().map(|m| &m.config)
    }

    fn is_visible(&self) -> bool {
        self.visible.iter().any(|v| *v)
    }
}

fn group_members<'d>(def: &'d TypeDef) -> Result<Vec<Candidate<'d>>, ConfigError> {
    let mut groups: Vec<Candidate<'d>> = Vec::new();

    for (index, member) in def.members.iter().enumerate() {
        let slot = member.kind.slot();
        match groups.iter_mut().find(|g| g.declared == member.name) {
            Some(group) => {
                if group.members[slot].is_some() {
                    return Err(ConfigError::DuplicateProperty {
                        owner: def.name,
                        name: member.name.to_owned(),
                    });
                }
                group.members[slot] = Some(member);
            }
            None => {
                let mut members = [None; 3];
                members[slot] = Some(member);
                groups.push(Candidate {
                    declared: member.name,
                    json_name: member.name,
                    first: index,
                    members,
                    visible: [false; 3],
                    ignored: false,
                });
            }
        }
    }

    Ok(groups)
}

/// Applies visibility, renames and ignores to one group.
fn evaluate(
    group: &mut Candidate<'_>,
    def: &TypeDef,
    ctx: &Context<'_>,
) -> Result<(), ConfigError> {
    let detect = def.auto_detect.unwrap_or(ctx.auto_detect);

    for (slot, member) in group.members.iter().enumerate() {
        let Some(member) = member else { continue };
        let detected = match slot {
            FIELD => detect.detects_field(member.visibility),
            GETTER => detect.detects_getter(member.visibility),
            _ => detect.detects_setter(member.visibility),
        };
        group.visible[slot] = detected || member.config.is_explicit();
    }

    let mut rename: Option<&'static str> = None;
    for member in group.present() {
        let Some(name) = member.config.rename else { continue };
        match rename {
            Some(first) if first != name => {
                return Err(ConfigError::RenameConflict {
                    owner: def.name,
                    property: group.declared,
                    first,
                    second: name,
                });
            }
            _ => rename = Some(name),
        }
    }
    group.json_name = rename.unwrap_or(group.declared);

    group.ignored = group.present().any(|m| m.config.ignore)
        || def
            .ignored
            .iter()
            .any(|name| *name == group.declared || *name == group.json_name);
    Ok(())
}

/// Merges groups that ended up under the same JSON name.
fn merge<'d>(
    groups: Vec<Candidate<'d>>,
    owner: &'static str,
) -> Result<Vec<Candidate<'d>>, ConfigError> {
    let mut merged: Vec<Candidate<'d>> = Vec::with_capacity(groups.len());

    for group in groups {
        let Some(index) = merged.iter().position(|m| m.json_name == group.json_name) else {
            merged.push(group);
            continue;
        };
        let target = &mut merged[index];

        for slot in [FIELD, GETTER, SETTER] {
            match (target.members[slot], group.members[slot]) {
                (Some(_), Some(_)) => {
                    return Err(ConfigError::DuplicateProperty {
                        owner,
                        name: group.json_name.to_owned(),
                    });
                }
                (None, Some(member)) => {
                    target.members[slot] = Some(member);
                    target.visible[slot] = group.visible[slot];
                }
                _ => {}
            }
        }
        target.ignored |= group.ignored;
    }

    Ok(merged)
}

// -----------------------------------------------------------------------------
// Property

fn build_property(
    group: &Candidate<'_>,
    def: &TypeDef,
    ctx: &Context<'_>,
) -> Result<PropertyInfo, ConfigError> {
    let field = group.members[FIELD];
    let getter = group.members[GETTER];
    let setter = group.members[SETTER];

    let reader = match (getter, field) {
        (Some(member), _) if group.visible[GETTER] => match member.kind {
            MemberKind::Getter(f) => Some(AccessorRef::Method(f)),
            _ => None,
        },
        (_, Some(member)) if group.visible[FIELD] => Some(AccessorRef::Field(member.name)),
        _ => None,
    };

    let setter_fn = setter.and_then(|member| match member.kind {
        MemberKind::Setter(f) => Some(f),
        _ => None,
    });
    let writer = match (setter_fn, field) {
        (Some(f), _) if group.visible[SETTER] => Some(AccessorRef::Method(f)),
        (_, Some(member)) => Some(AccessorRef::Field(member.name)),
        (Some(f), None) => Some(AccessorRef::Method(f)),
        (None, None) => None,
    };

    let primary = field.or(getter).or(setter);
    let value_type = primary.map_or(ValueType::Any, |m| m.value_type.clone());
    let visibility = group
        .present()
        .map(|m| m.visibility)
        .max()
        .unwrap_or(Visibility::Public);

    let mut aliases: Vec<String> = Vec::new();
    for alias in group.present().flat_map(|m| m.config.aliases.iter()) {
        if *alias != group.json_name && !aliases.iter().any(|a| a == *alias) {
            aliases.push((*alias).to_owned());
        }
    }

    let inclusion = group
        .configs()
        .find_map(|c| c.include)
        .or(def.inclusion)
        .unwrap_or(ctx.inclusion);

    let format = match group.configs().find_map(|c| c.format) {
        Some(pattern) => Some(
            DatePattern::compile(pattern)
                .map_err(|source| ConfigError::InvalidPattern { owner: def.name, source })?,
        ),
        None => None,
    };

    let inject = group.configs().find_map(|c| c.inject).map(|key| match key {
        Some(key) => key.to_owned(),
        None => value_type.name().into_owned(),
    });

    let serializer = match group.configs().find_map(|c| c.serialize_with) {
        Some(name) => Some(resolve_serializer(name, def.name, ctx)?),
        None => None,
    };
    let deserializer = match group.configs().find_map(|c| c.deserialize_with) {
        Some(name) => Some(resolve_deserializer(name, def.name, ctx)?),
        None => None,
    };

    Ok(PropertyInfo {
        declared_name: group.declared,
        json_name: group.json_name.to_owned(),
        aliases,
        order: None,
        visibility,
        inclusion,
        ignored: group.ignored,
        value_type,
        reader,
        writer,
        format,
        unwrap: group.configs().find_map(|c| c.unwrap.clone()),
        inject,
        elided: false,
        reference: group.configs().find_map(|c| c.reference.clone()),
        serializer,
        deserializer,
    })
}

fn resolve_serializer(
    name: &'static str,
    owner: &'static str,
    ctx: &Context<'_>,
) -> Result<NamedHook<dyn crate::serde::SerializeHook>, ConfigError> {
    ctx.serializers
        .get(name)
        .map(|hook| NamedHook::new(name, hook.clone()))
        .ok_or(ConfigError::MissingHook { owner, name })
}

fn resolve_deserializer(
    name: &'static str,
    owner: &'static str,
    ctx: &Context<'_>,
) -> Result<NamedHook<dyn crate::serde::DeserializeHook>, ConfigError> {
    ctx.deserializers
        .get(name)
        .map(|hook| NamedHook::new(name, hook.clone()))
        .ok_or(ConfigError::MissingHook { owner, name })
}

// -----------------------------------------------------------------------------
// describe

/// Builds the descriptor of one flattened definition.
///
/// Discriminators are left unset; they are assigned when polymorphic
/// families are linked.
pub(crate) fn describe(def: &TypeDef, ctx: &Context<'_>) -> Result<TypeInfo, ConfigError> {
    if let Some(which) = def.duplicate_any {
        return Err(ConfigError::DuplicateAnyAccessor(def.name, which));
    }

    let mut groups = group_members(def)?;
    for group in &mut groups {
        evaluate(group, def, ctx)?;
    }
    groups.retain(|g| g.ignored || g.is_visible());
    let mut groups = merge(groups, def.name)?;

    // Explicit order first, then declaration order.
    let rank = |g: &Candidate<'_>| {
        def.order
            .iter()
            .position(|name| *name == g.json_name || *name == g.declared)
    };
    groups.sort_by_key(|g| (rank(g).unwrap_or(usize::MAX), g.first));

    let mut properties = Vec::with_capacity(groups.len());
    for group in &groups {
        let mut property = build_property(group, def, ctx)?;
        property.order = rank(group);
        properties.push(property);
    }

    // The identity property leads.
    if let Some(identity) = &def.identity
        && identity.generator() == IdentityGenerator::Property
    {
        let index = properties
            .iter()
            .position(|p| !p.ignored && p.reader.is_some() && p.json_name == identity.property())
            .ok_or(ConfigError::InvalidIdentity {
                owner: def.name,
                reason: "identity property is not a readable property",
            })?;
        let property = properties.remove(index);
        properties.insert(0, property);
    }

    let mut lookup = build_lookup(def, &properties)?;

    let creator = match &def.creator {
        Some(creator) => {
            if creator.mode == CreatorMode::SingleArg && creator.args.len() != 1 {
                return Err(ConfigError::InvalidCreator {
                    owner: def.name,
                    reason: "a single-argument creator takes exactly one argument",
                });
            }
            for (index, arg) in creator.args.iter().enumerate() {
                if creator.args[..index].iter().any(|a| a.name() == arg.name()) {
                    return Err(ConfigError::InvalidCreator {
                        owner: def.name,
                        reason: "argument names must be unique",
                    });
                }
            }
            Some(CreatorInfo::new(creator.mode, creator.args.clone(), creator.func))
        }
        None => None,
    };

    if let Some(creator) = &creator {
        for (index, arg) in creator.args().iter().enumerate() {
            lookup
                .entry(arg.name().to_owned())
                .or_insert(KeyTarget::CreatorArg(index));
        }
    }

    if let Some(identity) = &def.identity
        && identity.generator() == IdentityGenerator::Sequence
    {
        let taken = properties
            .iter()
            .any(|p| !p.ignored && p.json_name == identity.property());
        if taken {
            return Err(ConfigError::InvalidIdentity {
                owner: def.name,
                reason: "generated identity key collides with a property",
            });
        }
        lookup.insert(identity.property().to_owned(), KeyTarget::Meta);
    }

    let serializer = match def.serialize_with {
        Some(name) => Some(resolve_serializer(name, def.name, ctx)?),
        None => None,
    };
    let deserializer = match def.deserialize_with {
        Some(name) => Some(resolve_deserializer(name, def.name, ctx)?),
        None => None,
    };

    Ok(TypeInfo {
        name: def.name,
        fields: declared_fields(def),
        properties: properties.into_boxed_slice(),
        lookup,
        creator,
        any_getter: def.any_getter,
        any_setter: def.any_setter,
        identity: def.identity.clone(),
        discriminator: None,
        value_accessor: def.value_accessor,
        serializer,
        deserializer,
        opaque: def.opaque,
        ignore_unknown: def.ignore_unknown,
        root_name: def.root_name,
    })
}

/// Input keys of the type. Primary names win over aliases, aliases win over
/// ignored names.
fn build_lookup(
    def: &TypeDef,
    properties: &[PropertyInfo],
) -> Result<HashMap<String, KeyTarget>, ConfigError> {
    let mut lookup: HashMap<String, KeyTarget> = HashMap::default();

    for name in &def.ignored {
        lookup.insert((*name).to_owned(), KeyTarget::Ignored);
    }
    for property in properties.iter().filter(|p| p.ignored) {
        lookup.insert(property.declared_name.to_owned(), KeyTarget::Ignored);
        for name in property.names() {
            lookup.insert(name.to_owned(), KeyTarget::Ignored);
        }
    }

    for (index, property) in properties.iter().enumerate() {
        if property.ignored {
            continue;
        }
        for alias in &property.aliases {
            let previous = lookup.insert(alias.clone(), KeyTarget::Property { index, alias: true });
            if let Some(KeyTarget::Property { index: other, .. }) = previous
                && other != index
            {
                return Err(ConfigError::DuplicateProperty {
                    owner: def.name,
                    name: alias.clone(),
                });
            }
        }
    }

    for (index, property) in properties.iter().enumerate() {
        if !property.ignored {
            lookup.insert(
                property.json_name.clone(),
                KeyTarget::Property { index, alias: false },
            );
        }
    }

    Ok(lookup)
}

/// Every declared field with its type, catch-all maps included.
fn declared_fields(def: &TypeDef) -> Box<[(&'static str, ValueType)]> {
    let mut fields: Vec<(&'static str, ValueType)> = def
        .members
        .iter()
        .filter(|m| matches!(m.kind, MemberKind::Field))
        .map(|m| (m.name, m.value_type.clone()))
        .collect();

    let catch_all = [
        def.any_getter.and_then(|a| a.field_name()),
        def.any_setter.and_then(|a| a.field_name()),
    ];
    for name in catch_all.into_iter().flatten() {
        if !fields.iter().any(|(field, _)| *field == name) {
            fields.push((name, ValueType::map(ValueType::Any)));
        }
    }

    fields.into_boxed_slice()
}
