use gradia_engine::coords::Vec2;
use gradia_engine::paint::GradientQuality;

use crate::config::GradientConfig;

/// How a backend draws control-point markers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Marker {
    /// One-unit outline of the given radius.
    Stroke(f32),
    /// Filled disc of the given radius.
    Fill(f32),
}

/// Drawing surface a backend exposes to the controller.
///
/// Coordinates are canvas-local logical units with `(0, 0)` at the top-left
/// corner of the canvas.
pub trait Canvas {
    const MARKER: Marker;

    /// Quality hint for the next gradient fill. Backends without dithering
    /// ignore it.
    fn set_quality(&mut self, _quality: GradientQuality) {}

    /// Covers the whole canvas with the gradient described by `config`.
    fn fill_gradient(&mut self, config: &GradientConfig);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: [u8; 3]);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: [u8; 3]);

    fn draw_marker(&mut self, center: Vec2, color: [u8; 3]) {
        match Self::MARKER {
            Marker::Stroke(radius) => self.stroke_circle(center, radius, color),
            Marker::Fill(radius) => self.fill_circle(center, radius, color),
        }
    }
}
