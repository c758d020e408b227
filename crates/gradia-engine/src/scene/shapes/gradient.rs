use crate::coords::Rect;
use crate::paint::{Gradient, GradientQuality};
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Fills `rect` with a gradient whose geometry is given in the same logical
/// pixel space as `rect` (not relative to it).
#[derive(Debug, Clone, PartialEq)]
pub struct GradientCmd {
    pub rect: Rect,
    pub gradient: Gradient,
    pub quality: GradientQuality,
}

impl DrawList {
    /// Records a gradient fill.
    #[inline]
    pub fn push_gradient(&mut self, z: ZIndex, rect: Rect, gradient: Gradient, quality: GradientQuality) {
        self.push(z, DrawCmd::Gradient(GradientCmd { rect, gradient, quality }));
    }
}
