use crate::def::{CreatorDef, MemberDef};
use crate::info::{AccessorRef, AnyGetter, AnySetter, AutoDetect, Getter};
use crate::info::{IdentityGenerator, IdentityInfo, Inclusion};
use crate::value::ValueType;

/// The definition of one object type.
///
/// Members are listed in declaration order; that order decides the output
/// order of properties not named by [`TypeDef::order`].
#[derive(Clone, Debug)]
pub struct TypeDef {
    pub(crate) name: &'static str,
    pub(crate) extends: Option<&'static str>,
    pub(crate) members: Vec<MemberDef>,
    pub(crate) auto_detect: Option<AutoDetect>,
    pub(crate) inclusion: Option<Inclusion>,
    pub(crate) order: Vec<&'static str>,
    pub(crate) ignored: Vec<&'static str>,
    pub(crate) ignore_unknown: bool,
    pub(crate) opaque: bool,
    pub(crate) creator: Option<CreatorDef>,
    pub(crate) any_getter: Option<AccessorRef<AnyGetter>>,
    pub(crate) any_setter: Option<AccessorRef<AnySetter>>,
    pub(crate) duplicate_any: Option<&'static str>,
    pub(crate) identity: Option<IdentityInfo>,
    pub(crate) discriminator: Option<&'static str>,
    pub(crate) subtypes: Vec<(&'static str, &'static str)>,
    pub(crate) serialize_with: Option<&'static str>,
    pub(crate) deserialize_with: Option<&'static str>,
    pub(crate) value_accessor: Option<AccessorRef<Getter>>,
    pub(crate) root_name: Option<&'static str>,
}

impl TypeDef {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            extends: None,
            members: Vec::new(),
            auto_detect: None,
            inclusion: None,
            order: Vec::new(),
            ignored: Vec::new(),
            ignore_unknown: false,
            opaque: false,
            creator: None,
            any_getter: None,
            any_setter: None,
            duplicate_any: None,
            identity: None,
            discriminator: None,
            subtypes: Vec::new(),
            serialize_with: None,
            deserialize_with: None,
            value_accessor: None,
            root_name: None,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Inherits the members and defaults of `base`.
    pub fn extends(mut self, base: &'static str) -> Self {
        self.extends = Some(base);
        self
    }

    pub fn member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }

    /// A public field without options.
    pub fn field(self, name: &'static str, value_type: ValueType) -> Self {
        self.member(MemberDef::field(name, value_type))
    }

    /// Overrides the discovery thresholds for this type.
    pub fn auto_detect(mut self, detect: AutoDetect) -> Self {
        self.auto_detect = Some(detect);
        self
    }

    /// Default inclusion for properties without their own.
    pub fn include(mut self, inclusion: Inclusion) -> Self {
        self.inclusion = Some(inclusion);
        self
    }

    /// Explicit output order; names may be JSON or declared names, the list
    /// may be partial.
    pub fn order(mut self, names: &[&'static str]) -> Self {
        self.order = names.to_vec();
        self
    }

    /// Removes the named properties in both directions.
    pub fn ignore_properties(mut self, names: &[&'static str]) -> Self {
        self.ignored.extend_from_slice(names);
        self
    }

    /// Discards unknown input keys for this type.
    pub fn ignore_unknown(mut self) -> Self {
        self.ignore_unknown = true;
        self
    }

    /// Properties declared with this type are never written and read as
    /// null.
    pub fn opaque(mut self) -> Self {
        self.opaque = true;
        self
    }

    pub fn creator(mut self, creator: CreatorDef) -> Self {
        self.creator = Some(creator);
        self
    }

    pub fn any_getter(mut self, accessor: AccessorRef<AnyGetter>) -> Self {
        if self.any_getter.replace(accessor).is_some() {
            self.duplicate_any = Some("any-getter");
        }
        self
    }

    pub fn any_setter(mut self, accessor: AccessorRef<AnySetter>) -> Self {
        if self.any_setter.replace(accessor).is_some() {
            self.duplicate_any = Some("any-setter");
        }
        self
    }

    /// Writes repeated instances as their identity key.
    pub fn identity(mut self, property: &'static str, generator: IdentityGenerator) -> Self {
        self.identity = Some(IdentityInfo::new(property, generator));
        self
    }

    /// Makes the type a polymorphic base tagged under `property`.
    pub fn discriminator(mut self, property: &'static str) -> Self {
        self.discriminator = Some(property);
        self
    }

    /// Registers `type_name` as the variant `variant` of this base.
    pub fn subtype(mut self, variant: &'static str, type_name: &'static str) -> Self {
        self.subtypes.push((variant, type_name));
        self
    }

    /// Converts whole objects with the serializer hook registered under
    /// `hook`.
    pub fn serialize_with(mut self, hook: &'static str) -> Self {
        self.serialize_with = Some(hook);
        self
    }

    pub fn deserialize_with(mut self, hook: &'static str) -> Self {
        self.deserialize_with = Some(hook);
        self
    }

    /// Writes the object as the single value returned by `accessor`.
    pub fn json_value(mut self, accessor: AccessorRef<Getter>) -> Self {
        self.value_accessor = Some(accessor);
        self
    }

    /// The key used when the root value is wrapped; defaults to the type
    /// name.
    pub fn root_name(mut self, name: &'static str) -> Self {
        self.root_name = Some(name);
        self
    }
}
