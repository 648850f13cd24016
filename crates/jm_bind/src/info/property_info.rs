use crate::format::DatePattern;
use crate::info::{AccessorRef, Getter, Inclusion, Setter, Visibility};
use crate::serde::{DeserializeHook, NamedHook, SerializeHook};
use crate::value::{Object, Value, ValueType};

// -----------------------------------------------------------------------------
// Auxiliary

/// Merges the properties of a nested object into its parent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnwrapSpec {
    pub prefix: String,
    pub suffix: String,
}

impl UnwrapSpec {
    /// The key a nested property is written under.
    #[inline]
    pub fn key(&self, name: &str) -> String {
        format!("{}{name}{}", self.prefix, self.suffix)
    }

    /// Composes an outer spec around this one.
    pub(crate) fn within(&self, outer: &UnwrapSpec) -> UnwrapSpec {
        UnwrapSpec {
            prefix: format!("{}{}", outer.prefix, self.prefix),
            suffix: format!("{}{}", self.suffix, outer.suffix),
        }
    }
}

/// The two sides of a parent/child link.
///
/// The managed side is written normally. The back side is never written and
/// is set to the parent while reading it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferenceRole {
    Managed(&'static str),
    Back(&'static str),
}

// -----------------------------------------------------------------------------
// PropertyInfo

/// One logical property of a type.
#[derive(Clone, Debug)]
pub struct PropertyInfo {
    pub(crate) declared_name: &'static str,
    pub(crate) json_name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) order: Option<usize>,
    pub(crate) visibility: Visibility,
    pub(crate) inclusion: Inclusion,
    pub(crate) ignored: bool,
    pub(crate) value_type: ValueType,
    pub(crate) reader: Option<AccessorRef<Getter>>,
    pub(crate) writer: Option<AccessorRef<Setter>>,
    pub(crate) format: Option<DatePattern>,
    pub(crate) unwrap: Option<UnwrapSpec>,
    pub(crate) inject: Option<String>,
    pub(crate) elided: bool,
    pub(crate) reference: Option<ReferenceRole>,
    pub(crate) serializer: Option<NamedHook<dyn SerializeHook>>,
    pub(crate) deserializer: Option<NamedHook<dyn DeserializeHook>>,
}

impl PropertyInfo {
    /// The member name the property was discovered under.
    #[inline]
    pub const fn declared_name(&self) -> &'static str {
        self.declared_name
    }

    /// The key written on output and matched first on input.
    #[inline]
    pub fn json_name(&self) -> &str {
        &self.json_name
    }

    /// Extra keys accepted on input, in declaration order.
    #[inline]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The primary name followed by the aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        core::iter::once(self.json_name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Position in an explicit order list, if the type declared one.
    #[inline]
    pub const fn order(&self) -> Option<usize> {
        self.order
    }

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub const fn inclusion(&self) -> Inclusion {
        self.inclusion
    }

    #[inline]
    pub const fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Declared as an opaque type: never written, always read as null.
    #[inline]
    pub const fn is_elided(&self) -> bool {
        self.elided
    }

    #[inline]
    pub const fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    #[inline]
    pub const fn format(&self) -> Option<&DatePattern> {
        self.format.as_ref()
    }

    #[inline]
    pub const fn unwrap_spec(&self) -> Option<&UnwrapSpec> {
        self.unwrap.as_ref()
    }

    /// The injectable key, if the property is injected.
    #[inline]
    pub fn inject_key(&self) -> Option<&str> {
        self.inject.as_deref()
    }

    #[inline]
    pub const fn reference(&self) -> Option<&ReferenceRole> {
        self.reference.as_ref()
    }

    #[inline]
    pub fn is_back_reference(&self) -> bool {
        matches!(self.reference, Some(ReferenceRole::Back(_)))
    }

    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.reader.is_some()
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    /// Reads the property, falling back to the type's default value.
    pub fn read(&self, object: &Object) -> Value {
        self.reader
            .as_ref()
            .and_then(|reader| reader.read(object))
            .unwrap_or_else(|| self.value_type.default_value())
    }

    /// Writes the property; returns `false` for read-only properties.
    pub fn write(&self, object: &mut Object, value: Value) -> bool {
        match &self.writer {
            Some(writer) => {
                writer.write(object, value);
                true
            }
            None => false,
        }
    }
}
