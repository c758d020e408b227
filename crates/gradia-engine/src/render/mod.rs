//! GPU rendering subsystem.
//!
//! Renderers consume `scene` draw streams and issue GPU commands via wgpu.
//! Each renderer owns its GPU resources and creates them on first use.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using the viewport uniform.
//! - Colors reach the shaders premultiplied and in linear light; the sRGB
//!   surface encodes on store.

mod ctx;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
pub use shapes::{CircleRenderer, GradientRenderer, ImageRenderer, RectRenderer, TextRenderer};
