use jm_utils::hash::HashMap;

use crate::info::{AccessorRef, AnyGetter, AnySetter, CreatorInfo, Getter};
use crate::info::{DiscriminatorInfo, IdentityInfo, PropertyInfo};
use crate::serde::{DeserializeHook, NamedHook, SerializeHook};
use crate::value::{Object, ValueType};

/// What an input key binds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyTarget {
    /// A property, by its primary name or by one of its aliases.
    Property { index: usize, alias: bool },
    /// A creator argument.
    CreatorArg(usize),
    /// A name consumed and discarded.
    Ignored,
    /// The discriminator or a generated identity key.
    Meta,
}

/// The descriptor of one registered type.
///
/// # Examples
///
/// ```
/// use jm_bind::def::{MemberDef, TypeDef};
/// use jm_bind::registry::TypeRegistry;
/// use jm_bind::value::ValueType;
///
/// let mut builder = TypeRegistry::builder();
/// builder.register(
///     TypeDef::new("Person")
///         .field("lastName", ValueType::String)
///         .member(MemberDef::field("firstName", ValueType::String).alias("fName"))
///         .order(&["firstName"]),
/// );
/// let registry = builder.build().unwrap();
///
/// let info = registry.get("Person").unwrap();
/// let names: Vec<_> = info.properties().iter().map(|p| p.json_name()).collect();
/// assert_eq!(names, ["firstName", "lastName"]);
/// assert!(info.property_by_key("fName").is_some());
/// ```
#[derive(Clone, Debug)]
pub struct TypeInfo {
    pub(crate) name: &'static str,
    pub(crate) fields: Box<[(&'static str, ValueType)]>,
    pub(crate) properties: Box<[PropertyInfo]>,
    pub(crate) lookup: HashMap<String, KeyTarget>,
    pub(crate) creator: Option<CreatorInfo>,
    pub(crate) any_getter: Option<AccessorRef<AnyGetter>>,
    pub(crate) any_setter: Option<AccessorRef<AnySetter>>,
    pub(crate) identity: Option<IdentityInfo>,
    pub(crate) discriminator: Option<DiscriminatorInfo>,
    pub(crate) value_accessor: Option<AccessorRef<Getter>>,
    pub(crate) serializer: Option<NamedHook<dyn SerializeHook>>,
    pub(crate) deserializer: Option<NamedHook<dyn DeserializeHook>>,
    pub(crate) opaque: bool,
    pub(crate) ignore_unknown: bool,
    pub(crate) root_name: Option<&'static str>,
}

impl TypeInfo {
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Properties in output order, ignored ones included.
    #[inline]
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    /// The active property with the given primary JSON name.
    pub fn property(&self, json_name: &str) -> Option<&PropertyInfo> {
        match self.lookup.get(json_name)? {
            KeyTarget::Property { index, alias: false } => self.properties.get(*index),
            _ => None,
        }
    }

    /// The property an input key binds to, by primary name or alias.
    pub fn property_by_key(&self, key: &str) -> Option<&PropertyInfo> {
        match self.lookup.get(key)? {
            KeyTarget::Property { index, .. } => self.properties.get(*index),
            _ => None,
        }
    }

    /// The names `property` binds on input. Aliases shadowed by another
    /// property's primary name are left out.
    pub fn input_names<'p>(&'p self, property: &'p PropertyInfo) -> impl Iterator<Item = &'p str> {
        property.names().filter(move |name| match self.lookup.get(*name) {
            Some(KeyTarget::Property { index, .. }) => self
                .properties
                .get(*index)
                .is_some_and(|owner| core::ptr::eq(owner, property)),
            _ => true,
        })
    }

    /// Classifies an input key; `None` for unknown keys.
    #[inline]
    pub fn key_target(&self, key: &str) -> Option<KeyTarget> {
        self.lookup.get(key).copied()
    }

    /// The back-reference property with the given link name.
    pub fn back_reference(&self, link: &str) -> Option<&PropertyInfo> {
        use crate::info::ReferenceRole;
        self.properties
            .iter()
            .find(|p| matches!(p.reference, Some(ReferenceRole::Back(name)) if name == link))
    }

    #[inline]
    pub const fn creator(&self) -> Option<&CreatorInfo> {
        self.creator.as_ref()
    }

    #[inline]
    pub const fn any_getter(&self) -> Option<&AccessorRef<AnyGetter>> {
        self.any_getter.as_ref()
    }

    #[inline]
    pub const fn any_setter(&self) -> Option<&AccessorRef<AnySetter>> {
        self.any_setter.as_ref()
    }

    #[inline]
    pub const fn identity(&self) -> Option<&IdentityInfo> {
        self.identity.as_ref()
    }

    /// The tag this type writes, if it belongs to a polymorphic family.
    #[inline]
    pub const fn discriminator(&self) -> Option<&DiscriminatorInfo> {
        self.discriminator.as_ref()
    }

    #[inline]
    pub const fn value_accessor(&self) -> Option<&AccessorRef<Getter>> {
        self.value_accessor.as_ref()
    }

    #[inline]
    pub fn has_custom_serializer(&self) -> bool {
        self.serializer.is_some()
    }

    #[inline]
    pub fn has_custom_deserializer(&self) -> bool {
        self.deserializer.is_some()
    }

    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.opaque
    }

    #[inline]
    pub const fn ignores_unknown(&self) -> bool {
        self.ignore_unknown
    }

    /// The key used when the root value is wrapped.
    #[inline]
    pub fn root_name(&self) -> &'static str {
        self.root_name.unwrap_or(self.name)
    }

    /// A fresh object with every declared field at its default value.
    pub fn instantiate(&self) -> Object {
        let mut object = Object::new(self.name);
        for (name, value_type) in &self.fields {
            object.set(name, value_type.default_value());
        }
        object
    }
}
