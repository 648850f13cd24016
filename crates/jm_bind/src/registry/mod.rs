//! The type registry.
//!
//! ## Menu
//!
//! - [`RegistryBuilder`]: Collects [`TypeDef`](crate::def::TypeDef)s, named
//!   hooks and registry-wide defaults, then builds the registry.
//! - [`TypeRegistry`]: The immutable descriptor table. Shared read-only by
//!   every conversion, `Send + Sync`.
//! - [`SubtypeTable`]: The variant tags of one polymorphic base.

// -----------------------------------------------------------------------------
// Modules

mod subtype_table;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use subtype_table::SubtypeTable;
pub use type_registry::{RegistryBuilder, TypeRegistry};
