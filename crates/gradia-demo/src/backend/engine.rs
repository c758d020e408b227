use gradia_engine::coords::{Rect, Vec2};
use gradia_engine::paint::{Color, GradientQuality};
use gradia_engine::scene::{DrawList, ZIndex};

use crate::canvas::{Canvas, Marker};
use crate::config::GradientConfig;
use crate::mapping;

const STROKE_WIDTH: f32 = 1.0;

/// Records canvas drawing into a [`DrawList`] for the wgpu renderers.
///
/// Everything is clipped to `rect`; canvas-local coordinates are offset by
/// its origin.
pub struct EngineCanvas<'a> {
    list: &'a mut DrawList,
    rect: Rect,
    quality: GradientQuality,
}

impl<'a> EngineCanvas<'a> {
    pub fn new(list: &'a mut DrawList, rect: Rect) -> Self {
        Self { list, rect, quality: GradientQuality::Smooth }
    }

    #[inline]
    fn to_window(&self, p: Vec2) -> Vec2 {
        p + self.rect.origin
    }
}

impl Canvas for EngineCanvas<'_> {
    const MARKER: Marker = Marker::Stroke(3.0);

    fn set_quality(&mut self, quality: GradientQuality) {
        self.quality = quality;
    }

    fn fill_gradient(&mut self, config: &GradientConfig) {
        let gradient = mapping::engine_gradient(config, self.rect.origin);
        self.list.push_clip(self.rect);
        self.list.push_gradient(ZIndex::BACKGROUND, self.rect, gradient, self.quality);
        self.list.pop_clip();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, [r, g, b]: [u8; 3]) {
        let center = self.to_window(center);
        self.list.push_clip(self.rect);
        self.list.push_circle_outline(ZIndex::OVERLAY, center, radius, STROKE_WIDTH, Color::from_rgb8(r, g, b));
        self.list.pop_clip();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, [r, g, b]: [u8; 3]) {
        let center = self.to_window(center);
        self.list.push_clip(self.rect);
        self.list.push_solid_circle(ZIndex::OVERLAY, center, radius, Color::from_rgb8(r, g, b));
        self.list.pop_clip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradia_engine::scene::DrawCmd;

    #[test]
    fn gradient_is_clipped_to_canvas_and_carries_quality() {
        let mut list = DrawList::new();
        let rect = Rect::new(0.0, 122.0, 700.0, 528.0);
        let mut canvas = EngineCanvas::new(&mut list, rect);
        canvas.set_quality(GradientQuality::Dither);
        canvas.fill_gradient(&GradientConfig::default());

        let item = &list.items()[0];
        assert_eq!(item.clip_rect, Some(rect));
        let DrawCmd::Gradient(cmd) = &item.cmd else { panic!("expected a gradient") };
        assert_eq!(cmd.rect, rect);
        assert_eq!(cmd.quality, GradientQuality::Dither);
    }

    #[test]
    fn markers_are_offset_into_window_space() {
        let mut list = DrawList::new();
        let mut canvas = EngineCanvas::new(&mut list, Rect::new(10.0, 20.0, 100.0, 100.0));
        canvas.draw_marker(Vec2::new(5.0, 5.0), [0, 255, 255]);

        let DrawCmd::Circle(c) = &list.items()[0].cmd else { panic!("expected a circle") };
        assert_eq!(c.center, Vec2::new(15.0, 25.0));
        assert_eq!(c.fill, Color::transparent());
        let border = c.border.expect("outline has a border");
        assert_eq!(border.width, 1.0);
        assert_eq!(c.radius, 3.5);
    }
}
