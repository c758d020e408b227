//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands
//! - provide deterministic ordering (z-index + insertion order)
//! - keep shape-specific payloads and push helpers in `scene::shapes`

mod cmd;
mod list;
mod order;

pub mod shapes;

pub use cmd::DrawCmd;
pub use list::{DrawItem, DrawList};
pub use order::{SortKey, ZIndex};
pub use shapes::Border;
pub use shapes::circle::CircleCmd;
pub use shapes::gradient::GradientCmd;
pub use shapes::image::{ImageCmd, ImageData};
pub use shapes::rect::RectCmd;
pub use shapes::text::TextCmd;
