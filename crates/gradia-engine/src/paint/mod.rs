//! Paint model shared between the demo and renderers.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - gradient sources (linear, focal radial, conic) and quality hints
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod gradient;

pub use color::{linear_to_srgb, srgb_to_linear, Color};
pub use gradient::{
    ColorStop, ConicGradient, Gradient, GradientQuality, LinearGradient, RadialGradient, SpreadMode,
};
