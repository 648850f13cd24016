use crate::value::Value;

// -----------------------------------------------------------------------------
// Visibility

/// Declared visibility of a member, ordered from least to most visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visibility {
    Private,
    PackageDefault,
    Protected,
    #[default]
    Public,
}

// -----------------------------------------------------------------------------
// AutoDetect

/// Minimum visibility per member kind for implicit discovery.
///
/// Members with an explicit marker are discovered regardless.
///
/// ```
/// use jm_bind::info::{AutoDetect, Visibility};
///
/// let detect = AutoDetect::PUBLIC_ONLY.with_field(Visibility::Private);
/// assert!(detect.detects_field(Visibility::Private));
/// assert!(!detect.detects_getter(Visibility::Protected));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoDetect {
    pub field: Visibility,
    pub getter: Visibility,
    pub setter: Visibility,
}

impl AutoDetect {
    pub const PUBLIC_ONLY: Self = Self {
        field: Visibility::Public,
        getter: Visibility::Public,
        setter: Visibility::Public,
    };

    pub const ANY: Self = Self {
        field: Visibility::Private,
        getter: Visibility::Private,
        setter: Visibility::Private,
    };

    #[inline]
    pub const fn with_field(mut self, threshold: Visibility) -> Self {
        self.field = threshold;
        self
    }

    #[inline]
    pub const fn with_getter(mut self, threshold: Visibility) -> Self {
        self.getter = threshold;
        self
    }

    #[inline]
    pub const fn with_setter(mut self, threshold: Visibility) -> Self {
        self.setter = threshold;
        self
    }

    #[inline]
    pub fn detects_field(&self, visibility: Visibility) -> bool {
        visibility >= self.field
    }

    #[inline]
    pub fn detects_getter(&self, visibility: Visibility) -> bool {
        visibility >= self.getter
    }

    #[inline]
    pub fn detects_setter(&self, visibility: Visibility) -> bool {
        visibility >= self.setter
    }
}

impl Default for AutoDetect {
    #[inline]
    fn default() -> Self {
        Self::PUBLIC_ONLY
    }
}

// -----------------------------------------------------------------------------
// Inclusion

/// Output filter for a property value. Input is never filtered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Inclusion {
    #[default]
    Always,
    NonNull,
    /// Skips null, empty strings, empty lists and empty maps.
    NonEmpty,
}

impl Inclusion {
    pub fn includes(&self, value: &Value) -> bool {
        match self {
            Inclusion::Always => true,
            Inclusion::NonNull => !value.is_null(),
            Inclusion::NonEmpty => !value.is_empty(),
        }
    }
}
