// -----------------------------------------------------------------------------
// Identity

/// Where identity keys come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityGenerator {
    /// The value of an existing property.
    Property,
    /// A per-call counter starting at 1, written under its own key.
    Sequence,
}

/// Identity of a type: repeated instances are written as their key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityInfo {
    property: String,
    generator: IdentityGenerator,
}

impl IdentityInfo {
    #[inline]
    pub fn new(property: impl Into<String>, generator: IdentityGenerator) -> Self {
        Self {
            property: property.into(),
            generator,
        }
    }

    /// The JSON name the key is written under.
    #[inline]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[inline]
    pub const fn generator(&self) -> IdentityGenerator {
        self.generator
    }
}

// -----------------------------------------------------------------------------
// Discriminator

/// Where the variant tag is written. Only the embedded form is supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiscriminatorPosition {
    /// An ordinary top-level key of the object.
    #[default]
    Embedded,
}

/// The tag a concrete type writes, and the key it is written under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscriminatorInfo {
    property: String,
    position: DiscriminatorPosition,
    variant: String,
}

impl DiscriminatorInfo {
    #[inline]
    pub(crate) fn new(property: String, variant: String) -> Self {
        Self {
            property,
            position: DiscriminatorPosition::Embedded,
            variant,
        }
    }

    #[inline]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[inline]
    pub const fn position(&self) -> DiscriminatorPosition {
        self.position
    }

    #[inline]
    pub fn variant(&self) -> &str {
        &self.variant
    }
}
