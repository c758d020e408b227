use crate::scene::shapes::circle::CircleCmd;
use crate::scene::shapes::gradient::GradientCmd;
use crate::scene::shapes::image::ImageCmd;
use crate::scene::shapes::rect::RectCmd;
use crate::scene::shapes::text::TextCmd;

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a payload module under `scene::shapes::*` with its push helpers
/// - add a variant here
/// - add a matching renderer under `render::shapes::*`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Circle(CircleCmd),
    Gradient(GradientCmd),
    Image(ImageCmd),
    Text(TextCmd),
}
