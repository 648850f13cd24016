//! Descriptor tables built once per registry.
//!
//! ## Menu
//!
//! - [`TypeInfo`]: Everything the drivers need to convert one object type:
//!   ordered properties, key lookup table, creator, catch-all accessors,
//!   identity and discriminator, custom hooks.
//! - [`PropertyInfo`]: One logical property: its JSON name and aliases, the
//!   accessors used to read and write it, inclusion rule, formatter, unwrap,
//!   injection and reference role.
//! - [`CreatorInfo`]: A designated constructor with its named arguments.
//! - [`IdentityInfo`] / [`DiscriminatorInfo`]: Object identity and
//!   polymorphic tagging.
//! - [`AccessorRef`]: A field name or a method, used for getters, setters and
//!   catch-all accessors.
//! - [`Visibility`], [`AutoDetect`], [`Inclusion`]: Discovery and output
//!   filtering rules.
//!
//! Descriptors are produced by [`RegistryBuilder::build`] from
//! [`TypeDef`]s and are immutable afterwards.
//!
//! [`RegistryBuilder::build`]: crate::registry::RegistryBuilder::build
//! [`TypeDef`]: crate::def::TypeDef

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod creator_info;
mod identity_info;
mod property_info;
mod type_info;
mod visibility;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{AccessorRef, AnyGetter, AnySetter, Getter, Setter};
pub use creator_info::{CreatorArg, CreatorArgs, CreatorFn, CreatorInfo, CreatorMode};
pub use identity_info::{DiscriminatorInfo, DiscriminatorPosition};
pub use identity_info::{IdentityGenerator, IdentityInfo};
pub use property_info::{PropertyInfo, ReferenceRole, UnwrapSpec};
pub use type_info::{KeyTarget, TypeInfo};
pub use visibility::{AutoDetect, Inclusion, Visibility};
