use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Circle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub fill: Color,
    pub border: Option<Border>,
}

impl DrawList {
    /// Records a circle draw command.
    #[inline]
    pub fn push_circle(
        &mut self,
        z: ZIndex,
        center: Vec2,
        radius: f32,
        fill: Color,
        border: Option<Border>,
    ) {
        self.push(z, DrawCmd::Circle(CircleCmd { center, radius, fill, border }));
    }

    /// Records a filled circle.
    #[inline]
    pub fn push_solid_circle(&mut self, z: ZIndex, center: Vec2, radius: f32, color: Color) {
        self.push_circle(z, center, radius, color, None);
    }

    /// Records an unfilled circle outline.
    ///
    /// The stroke is centered on `radius`, so the ring spans
    /// `radius ± width / 2`.
    #[inline]
    pub fn push_circle_outline(&mut self, z: ZIndex, center: Vec2, radius: f32, width: f32, color: Color) {
        let outer = radius + width * 0.5;
        self.push_circle(z, center, outer, Color::transparent(), Some(Border::new(width, color)));
    }
}
