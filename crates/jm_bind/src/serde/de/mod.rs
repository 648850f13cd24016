// -----------------------------------------------------------------------------
// Modules

mod driver;
mod index;
mod injectables;
mod materializer;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use driver::DeserializeDriver;
pub use injectables::InjectableValues;
