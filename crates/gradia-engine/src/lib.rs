//! Gradia engine crate.
//!
//! Owns the platform + GPU runtime pieces used by the gradient demo: a single
//! window driven by winit, platform-agnostic input, a renderer-agnostic draw
//! list and the wgpu renderers that consume it.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;
