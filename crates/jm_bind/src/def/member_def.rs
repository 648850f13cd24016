use crate::info::{Getter, Inclusion, ReferenceRole, Setter, UnwrapSpec, Visibility};
use crate::value::ValueType;

// -----------------------------------------------------------------------------
// MemberKind

/// The three member kinds a property can be discovered from.
#[derive(Clone, Copy)]
pub enum MemberKind {
    Field,
    Getter(Getter),
    Setter(Setter),
}

impl MemberKind {
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            MemberKind::Field => "field",
            MemberKind::Getter(_) => "getter",
            MemberKind::Setter(_) => "setter",
        }
    }

    #[inline]
    pub(crate) const fn slot(&self) -> usize {
        match self {
            MemberKind::Field => 0,
            MemberKind::Getter(_) => 1,
            MemberKind::Setter(_) => 2,
        }
    }
}

impl core::fmt::Debug for MemberKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// -----------------------------------------------------------------------------
// PropertyConfig

/// Options attached to one member. Options of the members merged into one
/// property are combined.
#[derive(Clone, Debug, Default)]
pub struct PropertyConfig {
    pub(crate) rename: Option<&'static str>,
    pub(crate) aliases: Vec<&'static str>,
    pub(crate) explicit: bool,
    pub(crate) ignore: bool,
    pub(crate) include: Option<Inclusion>,
    pub(crate) format: Option<&'static str>,
    pub(crate) unwrap: Option<UnwrapSpec>,
    pub(crate) inject: Option<Option<&'static str>>,
    pub(crate) serialize_with: Option<&'static str>,
    pub(crate) deserialize_with: Option<&'static str>,
    pub(crate) reference: Option<ReferenceRole>,
}

impl PropertyConfig {
    /// Renames and other markers make a member visible regardless of its
    /// declared visibility.
    #[inline]
    pub(crate) fn is_explicit(&self) -> bool {
        self.explicit || self.rename.is_some()
    }
}

// -----------------------------------------------------------------------------
// MemberDef

/// A field, getter or setter of a type definition.
///
/// Members are public unless stated otherwise. Getters and setters are named
/// by their implicit property name (`name` for `getName`/`setName`).
#[derive(Clone, Debug)]
pub struct MemberDef {
    pub(crate) kind: MemberKind,
    pub(crate) name: &'static str,
    pub(crate) value_type: ValueType,
    pub(crate) visibility: Visibility,
    pub(crate) config: PropertyConfig,
}

impl MemberDef {
    fn new(kind: MemberKind, name: &'static str, value_type: ValueType) -> Self {
        Self {
            kind,
            name,
            value_type,
            visibility: Visibility::Public,
            config: PropertyConfig::default(),
        }
    }

    pub fn field(name: &'static str, value_type: ValueType) -> Self {
        Self::new(MemberKind::Field, name, value_type)
    }

    pub fn getter(name: &'static str, value_type: ValueType, getter: Getter) -> Self {
        Self::new(MemberKind::Getter(getter), name, value_type)
    }

    pub fn setter(name: &'static str, value_type: ValueType, setter: Setter) -> Self {
        Self::new(MemberKind::Setter(setter), name, value_type)
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Uses `name` as the JSON name of the whole property.
    pub fn rename(mut self, name: &'static str) -> Self {
        self.config.rename = Some(name);
        self
    }

    /// Accepts `alias` as an extra input key.
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.config.aliases.push(alias);
        self
    }

    pub fn aliases(mut self, aliases: &[&'static str]) -> Self {
        self.config.aliases.extend_from_slice(aliases);
        self
    }

    /// Discovers the member regardless of its visibility.
    pub fn explicit(mut self) -> Self {
        self.config.explicit = true;
        self
    }

    /// Removes the whole property in both directions.
    pub fn ignore(mut self) -> Self {
        self.config.ignore = true;
        self
    }

    pub fn include(mut self, inclusion: Inclusion) -> Self {
        self.config.include = Some(inclusion);
        self
    }

    /// Formats date-time values with a pattern such as `dd-MM-yyyy hh:mm:ss`.
    pub fn format(mut self, pattern: &'static str) -> Self {
        self.config.format = Some(pattern);
        self
    }

    /// Merges the nested object's properties into the parent.
    pub fn unwrap(mut self) -> Self {
        self.config.unwrap = Some(UnwrapSpec::default());
        self
    }

    pub fn unwrap_with(mut self, prefix: &str, suffix: &str) -> Self {
        self.config.unwrap = Some(UnwrapSpec {
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
        });
        self
    }

    /// Fills the property from the injectable value keyed by its type name.
    pub fn inject(mut self) -> Self {
        self.config.inject = Some(None);
        self
    }

    pub fn inject_key(mut self, key: &'static str) -> Self {
        self.config.inject = Some(Some(key));
        self
    }

    /// Writes the value with the serializer hook registered under `hook`.
    pub fn serialize_with(mut self, hook: &'static str) -> Self {
        self.config.serialize_with = Some(hook);
        self
    }

    /// Reads the value with the deserializer hook registered under `hook`.
    pub fn deserialize_with(mut self, hook: &'static str) -> Self {
        self.config.deserialize_with = Some(hook);
        self
    }

    /// The parent side of the link `name`.
    pub fn managed_reference(mut self, name: &'static str) -> Self {
        self.config.reference = Some(ReferenceRole::Managed(name));
        self
    }

    /// The child side of the link `name`, never written.
    pub fn back_reference(mut self, name: &'static str) -> Self {
        self.config.reference = Some(ReferenceRole::Back(name));
        self
    }
}
