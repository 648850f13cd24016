use std::sync::Arc;

use jm_utils::hash::HashMap;

use crate::ConfigError;
use crate::def::TypeDef;
use crate::info::{AutoDetect, Inclusion, TypeInfo};
use crate::introspect::{self, Context};
use crate::registry::SubtypeTable;
use crate::serde::{DeserializeHook, SerializeHook};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The descriptor table of every registered type.
///
/// Built once by [`RegistryBuilder::build`] and read-only afterwards.
///
/// # Example
///
/// ```
/// use jm_bind::def::TypeDef;
/// use jm_bind::registry::TypeRegistry;
/// use jm_bind::value::ValueType;
///
/// let mut builder = TypeRegistry::builder();
/// builder
///     .register(TypeDef::new("Animal").field("name", ValueType::String)
///         .discriminator("type")
///         .subtype("dog", "Dog")
///         .subtype("cat", "Cat"))
///     .register(TypeDef::new("Dog").extends("Animal").field("barkVolume", ValueType::Float))
///     .register(TypeDef::new("Cat").extends("Animal").field("lives", ValueType::Int));
/// let registry = builder.build().unwrap();
///
/// assert_eq!(registry.resolve("Animal", "cat").unwrap().name(), "Cat");
/// assert_eq!(registry.variant_of("Animal", "Dog"), Some("dog"));
/// ```
#[derive(Debug)]
pub struct TypeRegistry {
    types: HashMap<&'static str, TypeInfo>,
    subtypes: HashMap<&'static str, SubtypeTable>,
}

impl TypeRegistry {
    #[inline]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    #[inline]
    pub fn get(&self, type_name: &str) -> Option<&TypeInfo> {
        self.types.get(type_name)
    }

    #[inline]
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }

    /// The variant table of a polymorphic base.
    #[inline]
    pub fn subtypes(&self, base: &str) -> Option<&SubtypeTable> {
        self.subtypes.get(base)
    }

    /// The concrete descriptor registered under `variant` for `base`.
    pub fn resolve(&self, base: &str, variant: &str) -> Option<&TypeInfo> {
        let type_name = self.subtypes.get(base)?.resolve(variant)?;
        self.types.get(type_name)
    }

    /// The tag of `type_name` within the family of `base`.
    pub fn variant_of(&self, base: &str, type_name: &str) -> Option<&str> {
        self.subtypes.get(base)?.variant_of(type_name)
    }

    /// Returns `true` if a scalar node may stand for an instance of the type:
    /// the type, or a variant of it, has an identity.
    pub fn accepts_references(&self, type_name: &str) -> bool {
        if self.get(type_name).is_some_and(|info| info.identity.is_some()) {
            return true;
        }
        self.subtypes(type_name).is_some_and(|table| {
            table
                .iter()
                .any(|(_, ty)| self.get(ty).is_some_and(|info| info.identity.is_some()))
        })
    }
}

// -----------------------------------------------------------------------------
// RegistryBuilder

/// Collects definitions and hooks for a [`TypeRegistry`].
pub struct RegistryBuilder {
    defs: Vec<TypeDef>,
    auto_detect: AutoDetect,
    inclusion: Inclusion,
    serializers: HashMap<&'static str, Arc<dyn SerializeHook>>,
    deserializers: HashMap<&'static str, Arc<dyn DeserializeHook>>,
}

impl Default for RegistryBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            defs: Vec::new(),
            auto_detect: AutoDetect::PUBLIC_ONLY,
            inclusion: Inclusion::Always,
            serializers: HashMap::default(),
            deserializers: HashMap::default(),
        }
    }

    pub fn register(&mut self, def: TypeDef) -> &mut Self {
        self.defs.push(def);
        self
    }

    /// Discovery thresholds for types that do not set their own.
    pub fn default_auto_detect(&mut self, detect: AutoDetect) -> &mut Self {
        self.auto_detect = detect;
        self
    }

    /// Inclusion for properties whose type and member set none.
    pub fn default_inclusion(&mut self, inclusion: Inclusion) -> &mut Self {
        self.inclusion = inclusion;
        self
    }

    /// Registers a serializer hook under `name`; a later registration
    /// replaces an earlier one.
    pub fn serializer(
        &mut self,
        name: &'static str,
        hook: impl SerializeHook + 'static,
    ) -> &mut Self {
        self.serializers.insert(name, Arc::new(hook));
        self
    }

    pub fn deserializer(
        &mut self,
        name: &'static str,
        hook: impl DeserializeHook + 'static,
    ) -> &mut Self {
        self.deserializers.insert(name, Arc::new(hook));
        self
    }

    /// Builds every descriptor and validates the whole set.
    pub fn build(self) -> Result<TypeRegistry, ConfigError> {
        let mut by_name: HashMap<&'static str, &TypeDef> = HashMap::default();
        for def in &self.defs {
            if by_name.insert(def.name, def).is_some() {
                return Err(ConfigError::DuplicateType(def.name));
            }
        }

        let ctx = Context {
            auto_detect: self.auto_detect,
            inclusion: self.inclusion,
            serializers: &self.serializers,
            deserializers: &self.deserializers,
        };

        let mut types: HashMap<&'static str, TypeInfo> = HashMap::default();
        for def in &self.defs {
            let flat = introspect::flatten(def, &by_name)?;
            types.insert(def.name, introspect::describe(&flat, &ctx)?);
        }

        let subtypes = introspect::link(&mut types, &self.defs)?;

        log::debug!(
            "type registry built: {} types, {} polymorphic bases",
            types.len(),
            subtypes.len()
        );

        Ok(TypeRegistry { types, subtypes })
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::ConfigError;
    use crate::def::{MemberDef, TypeDef};
    use crate::info::{IdentityGenerator, Inclusion};
    use crate::value::ValueType;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn registry_is_shareable() {
        assert_send_sync::<TypeRegistry>();
    }

    #[test]
    fn duplicate_types() {
        let mut builder = TypeRegistry::builder();
        builder
            .register(TypeDef::new("User"))
            .register(TypeDef::new("User"));
        assert_eq!(builder.build().unwrap_err(), ConfigError::DuplicateType("User"));
    }

    #[test]
    fn default_inclusion_applies_to_unset_properties() {
        let mut builder = TypeRegistry::builder();
        builder
            .default_inclusion(Inclusion::NonNull)
            .register(
                TypeDef::new("User")
                    .field("name", ValueType::String)
                    .member(MemberDef::field("nick", ValueType::String).include(Inclusion::Always)),
            );
        let registry = builder.build().unwrap();
        let user = registry.get("User").unwrap();
        assert_eq!(user.property("name").unwrap().inclusion(), Inclusion::NonNull);
        assert_eq!(user.property("nick").unwrap().inclusion(), Inclusion::Always);
    }

    #[test]
    fn references_through_variants() {
        let mut builder = TypeRegistry::builder();
        builder
            .register(TypeDef::new("Shape").discriminator("kind").subtype("node", "Node"))
            .register(
                TypeDef::new("Node")
                    .field("id", ValueType::Int)
                    .identity("id", IdentityGenerator::Property),
            );
        let registry = builder.build().unwrap();
        assert!(registry.accepts_references("Shape"));
        assert!(registry.accepts_references("Node"));
    }
}
