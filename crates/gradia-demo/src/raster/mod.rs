//! CPU reference rasterizer.
//!
//! Evaluates gradients per pixel into an RGBA8 image with its own conventions
//! (conic angles in degrees, counter-clockwise sweep, no dithering) so the
//! GPU output can be compared against an independent implementation.

mod gradient;
mod surface;

pub use gradient::{apply_spread, Gradient, Shape, Spread, Stop};
pub use surface::Surface;
