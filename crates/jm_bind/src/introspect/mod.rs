//! Turns type definitions into descriptors.
//!
//! Three stages, all run once by
//! [`RegistryBuilder::build`](crate::registry::RegistryBuilder::build):
//!
//! - `inherit`: folds the `extends` chain of a definition into one flat
//!   definition.
//! - `discovery`: groups members into properties, applies visibility,
//!   renames, ignores and ordering, and builds the key lookup table.
//! - `link`: checks what spans several types (referenced types, unwrap,
//!   references, polymorphic families) and fills in the derived state.

// -----------------------------------------------------------------------------
// Modules

mod discovery;
mod inherit;
mod link;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use discovery::describe;
pub(crate) use inherit::flatten;
pub(crate) use link::link;

use std::sync::Arc;

use jm_utils::hash::HashMap;

use crate::info::{AutoDetect, Inclusion};
use crate::serde::{DeserializeHook, SerializeHook};

/// Registry-level defaults and hook tables.
pub(crate) struct Context<'a> {
    pub auto_detect: AutoDetect,
    pub inclusion: Inclusion,
    pub serializers: &'a HashMap<&'static str, Arc<dyn SerializeHook>>,
    pub deserializers: &'a HashMap<&'static str, Arc<dyn DeserializeHook>>,
}
