// -----------------------------------------------------------------------------
// Modules

mod driver;
mod object_serializer;
mod state;
mod value_serializer;

// -----------------------------------------------------------------------------
// Exports

pub use driver::SerializeDriver;
