#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod error;
mod mapper;

pub mod def;
pub mod format;
pub mod info;
pub mod registry;
pub mod serde;
pub mod value;

pub(crate) mod introspect;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{ConfigError, MapError};
pub use mapper::{Mapper, MapperConfig, UnknownProperties, ValueReader};

#[cfg(test)]
mod tests;
