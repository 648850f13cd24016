//! Declarative type definitions.
//!
//! A [`TypeDef`] lists the members of a type (fields, getters and setters)
//! together with the mapping options that apply to the type or to single
//! members. Definitions are registered on a
//! [`RegistryBuilder`](crate::registry::RegistryBuilder), which turns them
//! into immutable [`TypeInfo`](crate::info::TypeInfo) descriptors.
//!
//! ```
//! use jm_bind::def::{MemberDef, TypeDef};
//! use jm_bind::info::{Inclusion, Visibility};
//! use jm_bind::value::{Object, Value, ValueType};
//!
//! fn full_name(object: &Object) -> Value {
//!     object.get("name").cloned().unwrap_or_default()
//! }
//!
//! let def = TypeDef::new("User")
//!     .member(MemberDef::field("id", ValueType::Int).visibility(Visibility::Private))
//!     .member(MemberDef::getter("name", ValueType::String, full_name).rename("fullName"))
//!     .include(Inclusion::NonNull);
//!
//! assert_eq!(def.name(), "User");
//! ```

// -----------------------------------------------------------------------------
// Modules

mod creator_def;
mod member_def;
mod type_def;

// -----------------------------------------------------------------------------
// Exports

pub use creator_def::CreatorDef;
pub use member_def::{MemberDef, MemberKind, PropertyConfig};
pub use type_def::TypeDef;
