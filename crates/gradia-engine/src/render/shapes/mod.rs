//! Shape renderers, one per `DrawCmd` variant.

mod common;

pub mod circle;
pub mod gradient;
pub mod image;
pub mod rect;
pub mod text;

pub use circle::CircleRenderer;
pub use gradient::GradientRenderer;
pub use image::ImageRenderer;
pub use rect::RectRenderer;
pub use text::TextRenderer;
