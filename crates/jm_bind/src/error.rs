use thiserror::Error;

use crate::format::FormatError;
use crate::serde::{HookError, PropertyPath};
use crate::value::IdentityKey;

// -----------------------------------------------------------------------------
// ConfigError

/// A descriptor table that cannot be built.
///
/// Returned by [`RegistryBuilder::build`](crate::registry::RegistryBuilder::build),
/// always fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("type `{0}` is registered more than once")]
    DuplicateType(&'static str),

    #[error("type `{owner}` refers to unregistered type `{name}`")]
    UnknownType { owner: &'static str, name: &'static str },

    #[error("type `{0}` extends itself through its base chain")]
    InheritanceCycle(&'static str),

    #[error("variant `{variant}` is registered twice under base `{base}`")]
    AmbiguousDiscriminator { base: &'static str, variant: String },

    #[error("type `{type_name}` is registered as `{first}` and as `{second}`")]
    ConflictingVariant {
        type_name: &'static str,
        first: String,
        second: String,
    },

    #[error("base `{0}` declares subtypes but no discriminator property")]
    MissingDiscriminator(&'static str),

    #[error("unwrapped property `{property}` of `{owner}` collides on key `{key}`")]
    UnwrapCollision {
        owner: &'static str,
        property: &'static str,
        key: String,
    },

    #[error("property `{property}` of `{owner}` cannot be unwrapped: {reason}")]
    UnsupportedUnwrap {
        owner: &'static str,
        property: &'static str,
        reason: &'static str,
    },

    #[error("property `{property}` of `{owner}` is renamed both `{first}` and `{second}`")]
    RenameConflict {
        owner: &'static str,
        property: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("type `{owner}` declares property `{name}` more than once")]
    DuplicateProperty { owner: &'static str, name: String },

    #[error("type `{0}` declares more than one {1}")]
    DuplicateAnyAccessor(&'static str, &'static str),

    #[error("type `{owner}` uses hook `{name}`, which is not registered")]
    MissingHook { owner: &'static str, name: &'static str },

    #[error("type `{owner}` uses an invalid date pattern: {source}")]
    InvalidPattern {
        owner: &'static str,
        #[source]
        source: FormatError,
    },

    #[error("creator of `{owner}` is invalid: {reason}")]
    InvalidCreator { owner: &'static str, reason: &'static str },

    #[error("identity of `{owner}` is invalid: {reason}")]
    InvalidIdentity { owner: &'static str, reason: &'static str },

    #[error("managed reference `{name}` of `{owner}` has no back reference in `{target}`")]
    UnmatchedReference {
        owner: &'static str,
        target: &'static str,
        name: &'static str,
    },
}

// -----------------------------------------------------------------------------
// MapError

/// A conversion that failed; the whole call is aborted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    #[error("type `{type_name}` is not registered (at {path})")]
    UnknownType { type_name: String, path: PropertyPath },

    #[error("unknown variant `{variant}` for base `{base}` (at {path})")]
    UnknownSubtype {
        base: &'static str,
        variant: String,
        path: PropertyPath,
    },

    #[error("missing discriminator `{property}` for base `{base}` (at {path})")]
    MissingDiscriminator {
        base: &'static str,
        property: String,
        path: PropertyPath,
    },

    #[error("unknown property `{property}` for type `{type_name}` (at {path})")]
    UnknownProperty {
        type_name: &'static str,
        property: String,
        path: PropertyPath,
    },

    #[error("missing creator argument `{argument}` for type `{type_name}` (at {path})")]
    MissingArgument {
        type_name: &'static str,
        argument: &'static str,
        path: PropertyPath,
    },

    #[error("no injectable value for key `{key}` (at {path})")]
    MissingInjectable { key: String, path: PropertyPath },

    #[error("cannot format value at {path}: {source}")]
    Format {
        path: PropertyPath,
        #[source]
        source: FormatError,
    },

    #[error("cannot parse value at {path}: {source}")]
    FormatParse {
        path: PropertyPath,
        #[source]
        source: FormatError,
    },

    #[error("type `{type_name}` nested deeper than {depth} levels, probably a cycle (at {path})")]
    CyclicReference {
        type_name: &'static str,
        depth: usize,
        path: PropertyPath,
    },

    #[error("custom hook for `{target}` failed (at {path}): {source}")]
    CustomHook {
        target: String,
        path: PropertyPath,
        #[source]
        source: HookError,
    },

    #[error("reference to unknown identity {key} (at {path})")]
    UnresolvedReference { key: IdentityKey, path: PropertyPath },

    #[error("identity {key} is defined more than once")]
    DuplicateIdentity { key: IdentityKey },

    #[error("type `{type_name}` has no usable identity value (at {path})")]
    InvalidIdentity {
        type_name: &'static str,
        path: PropertyPath,
    },

    #[error("expected {expected}, found {found} (at {path})")]
    MismatchedType {
        expected: String,
        found: &'static str,
        path: PropertyPath,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, MapError};
    use crate::serde::PropertyPath;

    #[test]
    fn messages() {
        let error = ConfigError::AmbiguousDiscriminator {
            base: "Animal",
            variant: "dog".into(),
        };
        assert_eq!(
            error.to_string(),
            "variant `dog` is registered twice under base `Animal`"
        );

        let error = MapError::UnknownProperty {
            type_name: "User",
            property: "age".into(),
            path: PropertyPath::root(),
        };
        assert_eq!(
            error.to_string(),
            "unknown property `age` for type `User` (at $)"
        );
    }
}
