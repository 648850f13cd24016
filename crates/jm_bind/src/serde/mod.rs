//! Serialization and deserialization drivers.
//!
//! # Overview
//!
//! ## Serialization
//!
//! [`SerializeDriver`] implements `serde`'s `Serialize` for a [`Value`] and
//! follows a priority-based dispatch for every object it meets:
//!
//! 1. A custom [`SerializeHook`] attached to the type; its JSON is emitted
//!    verbatim.
//! 2. A value accessor; the object is written as that single value.
//! 3. Identity: an instance already written in this call is written as its
//!    [`IdentityKey`] only.
//! 4. The descriptor: discriminator first, then properties in order, then
//!    the any-getter entries.
//!
//! ## Deserialization
//!
//! [`DeserializeDriver`] is a `DeserializeSeed`. It reads the input into a
//! `serde_json::Value` node tree, indexes every identity-bearing node (so
//! forward references can be resolved), and then materializes the requested
//! type:
//!
//! 1. Polymorphic bases dispatch on the discriminator to the concrete type.
//! 2. A custom [`DeserializeHook`] takes over the whole node.
//! 3. Creator arguments are bound, injected or defaulted, and the creator is
//!    called.
//! 4. Remaining properties are bound by primary name, then by alias.
//! 5. Leftover keys go to the any-setter, are discarded, or fail the call.
//!
//! Both drivers create a fresh [`IdentityRegistry`] per top-level call.
//!
//! [`Value`]: crate::value::Value
//! [`IdentityKey`]: crate::value::IdentityKey

// -----------------------------------------------------------------------------
// Modules

mod de;
mod hook;
mod identity;
mod path;
mod ser;
mod type_stack;

// -----------------------------------------------------------------------------
// Exports

pub use de::{DeserializeDriver, InjectableValues};
pub use hook::{DeserializeHook, HookError, NamedHook, SerializeHook};
pub use identity::IdentityRegistry;
pub use path::{PathSegment, PropertyPath};
pub use ser::SerializeDriver;

pub(crate) use type_stack::{TypeStack, describe};
