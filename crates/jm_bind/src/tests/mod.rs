//! Conversion scenarios run through [`Mapper`](crate::Mapper).


mod creators;
mod properties;
