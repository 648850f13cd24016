use jm_utils::hash::HashMap;

use crate::ConfigError;

/// The closed variant set of one polymorphic base.
///
/// Maps variant tags to concrete type names and back. Tags are unique
/// within a base.
#[derive(Clone, Debug)]
pub struct SubtypeTable {
    base: &'static str,
    property: String,
    by_variant: HashMap<String, &'static str>,
    by_type: HashMap<&'static str, String>,
    // Registration order, for stable iteration.
    variants: Vec<(String, &'static str)>,
}

impl SubtypeTable {
    pub(crate) fn new(base: &'static str, property: &str) -> Self {
        Self {
            base,
            property: property.to_owned(),
            by_variant: HashMap::default(),
            by_type: HashMap::default(),
            variants: Vec::new(),
        }
    }

    /// Adds `type_name` under `variant`.
    pub(crate) fn register(
        &mut self,
        variant: &str,
        type_name: &'static str,
    ) -> Result<(), ConfigError> {
        if self.by_variant.contains_key(variant) {
            return Err(ConfigError::AmbiguousDiscriminator {
                base: self.base,
                variant: variant.to_owned(),
            });
        }
        if let Some(first) = self.by_type.get(type_name) {
            return Err(ConfigError::ConflictingVariant {
                type_name,
                first: first.clone(),
                second: variant.to_owned(),
            });
        }

        self.by_variant.insert(variant.to_owned(), type_name);
        self.by_type.insert(type_name, variant.to_owned());
        self.variants.push((variant.to_owned(), type_name));
        Ok(())
    }

    #[inline]
    pub const fn base(&self) -> &'static str {
        self.base
    }

    /// The key the tag is read from and written under.
    #[inline]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The concrete type registered under `variant`.
    #[inline]
    pub fn resolve(&self, variant: &str) -> Option<&'static str> {
        self.by_variant.get(variant).copied()
    }

    /// The tag of a concrete type.
    #[inline]
    pub fn variant_of(&self, type_name: &str) -> Option<&str> {
        self.by_type.get(type_name).map(String::as_str)
    }

    #[inline]
    pub fn contains_variant(&self, variant: &str) -> bool {
        self.by_variant.contains_key(variant)
    }

    /// `(variant, type)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.variants.iter().map(|(variant, ty)| (variant.as_str(), *ty))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.variants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::SubtypeTable;
    use crate::ConfigError;

    #[test]
    fn resolve_both_ways() {
        let mut table = SubtypeTable::new("Animal", "type");
        table.register("dog", "Dog").unwrap();
        table.register("cat", "Cat").unwrap();

        assert_eq!(table.resolve("cat"), Some("Cat"));
        assert_eq!(table.variant_of("Dog"), Some("dog"));
        assert_eq!(table.resolve("cow"), None);
        assert_eq!(table.iter().collect::<Vec<_>>(), [("dog", "Dog"), ("cat", "Cat")]);
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut table = SubtypeTable::new("Animal", "type");
        table.register("dog", "Dog").unwrap();

        assert_eq!(
            table.register("dog", "Wolf").unwrap_err(),
            ConfigError::AmbiguousDiscriminator {
                base: "Animal",
                variant: "dog".into()
            }
        );
        assert!(matches!(
            table.register("hound", "Dog"),
            Err(ConfigError::ConflictingVariant { type_name: "Dog", .. })
        ));
    }
}
