#![forbid(unsafe_code)]

//! Physical quantities for the vernier calculator.
//!
//! A [`Quantity`] is a numeric magnitude paired with a [`Unit`]; a unit is a
//! conversion (scale factor plus, for affine temperature scales, an offset)
//! into the seven SI base dimensions tracked by [`Dimension`]. The catalog of
//! named units is built once and queried by plain lookup.

mod catalog;
mod dimension;
mod error;
mod quantity;
mod unit;

pub use catalog::{lookup, resolve};
pub use dimension::Dimension;
pub use error::{Error, Result};
pub use quantity::Quantity;
pub use unit::Unit;
