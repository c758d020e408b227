use crate::coords::Vec2;

use super::Color;

/// Gradient spread behavior outside [0, 1] range.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    #[default]
    Pad,
    /// Repeat the gradient pattern.
    Repeat,
    /// Mirror-repeat the gradient pattern.
    Reflect,
}

/// Rasterization quality hint for gradient fills.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum GradientQuality {
    /// Plain interpolation, quantized by the render target.
    #[default]
    Smooth,
    /// Ordered dithering before quantization to hide banding.
    Dither,
}

/// A single gradient stop.
///
/// `t` is expected in [0, 1]. Renderers may clamp/sort stops at build time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient: `t = 0` at `start`, `t = 1` at `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self { start, end, stops, spread }
    }
}

/// Focal radial gradient.
///
/// `t = 0` at `focal`, `t = 1` on the circle of `radius` around `center`.
/// A focal point outside the circle is pulled back inside by renderers
/// (see [`RadialGradient::effective_focal`]).
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub focal: Vec2,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
}

impl RadialGradient {
    /// Fraction of the radius a focal point may reach before it is clamped.
    pub const FOCAL_LIMIT: f32 = 0.99;

    pub fn new(center: Vec2, focal: Vec2, radius: f32, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self { center, focal, radius, stops, spread }
    }

    /// Returns the focal point clamped to lie strictly inside the circle.
    pub fn effective_focal(&self) -> Vec2 {
        let offset = self.focal - self.center;
        let limit = self.radius.max(0.0) * Self::FOCAL_LIMIT;
        let len = offset.length();
        if len <= limit {
            self.focal
        } else if len > 0.0 {
            self.center + offset * (limit / len)
        } else {
            self.center
        }
    }
}

/// Conic (sweep) gradient around `center`.
///
/// `angle` is the start angle in radians. With +Y down, `t` grows clockwise on
/// screen and wraps once per turn, so the spread mode has no effect.
#[derive(Debug, Clone, PartialEq)]
pub struct ConicGradient {
    pub center: Vec2,
    pub angle: f32,
    pub stops: Vec<ColorStop>,
}

impl ConicGradient {
    pub fn new(center: Vec2, angle: f32, stops: Vec<ColorStop>) -> Self {
        Self { center, angle, stops }
    }
}

/// Any gradient the engine can fill with.
#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Linear(LinearGradient),
    Radial(RadialGradient),
    Conic(ConicGradient),
}

impl Gradient {
    pub fn stops(&self) -> &[ColorStop] {
        match self {
            Gradient::Linear(g) => &g.stops,
            Gradient::Radial(g) => &g.stops,
            Gradient::Conic(g) => &g.stops,
        }
    }

    /// Spread mode; conic gradients always report `Repeat`.
    pub fn spread(&self) -> SpreadMode {
        match self {
            Gradient::Linear(g) => g.spread,
            Gradient::Radial(g) => g.spread,
            Gradient::Conic(_) => SpreadMode::Repeat,
        }
    }

    /// Returns true when the definition is structurally usable.
    ///
    /// Degenerate geometry (zero-length axis, zero radius) is still valid; renderers
    /// paint it with the last stop.
    pub fn is_valid(&self) -> bool {
        let stops_ok = self.stops().len() >= 2
            && self.stops().iter().all(|s| s.t.is_finite() && s.color.is_finite());
        let geom_ok = match self {
            Gradient::Linear(g) => g.start.is_finite() && g.end.is_finite(),
            Gradient::Radial(g) => g.center.is_finite() && g.focal.is_finite() && g.radius.is_finite(),
            Gradient::Conic(g) => g.center.is_finite() && g.angle.is_finite(),
        };
        stops_ok && geom_ok
    }
}

impl From<LinearGradient> for Gradient {
    fn from(g: LinearGradient) -> Self {
        Gradient::Linear(g)
    }
}

impl From<RadialGradient> for Gradient {
    fn from(g: RadialGradient) -> Self {
        Gradient::Radial(g)
    }
}

impl From<ConicGradient> for Gradient {
    fn from(g: ConicGradient) -> Self {
        Gradient::Conic(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw() -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.0, Color::from_rgb8(0, 0, 0)),
            ColorStop::new(1.0, Color::from_rgb8(255, 255, 255)),
        ]
    }

    #[test]
    fn focal_inside_circle_is_kept() {
        let g = RadialGradient::new(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0), 10.0, bw(), SpreadMode::Pad);
        assert_eq!(g.effective_focal(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn focal_outside_circle_is_pulled_in() {
        let g = RadialGradient::new(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0), 10.0, bw(), SpreadMode::Pad);
        let f = g.effective_focal();
        assert!((f.length() - 9.9).abs() < 1e-4);
        // Direction is preserved.
        assert!((f.x / f.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn zero_radius_collapses_focal_onto_center() {
        let g = RadialGradient::new(Vec2::new(5.0, 5.0), Vec2::new(6.0, 5.0), 0.0, bw(), SpreadMode::Pad);
        assert_eq!(g.effective_focal(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn single_stop_is_invalid() {
        let g = Gradient::Conic(ConicGradient::new(Vec2::zero(), 0.0, bw()[..1].to_vec()));
        assert!(!g.is_valid());
    }

    #[test]
    fn conic_reports_repeat_spread() {
        let g: Gradient = ConicGradient::new(Vec2::zero(), 1.0, bw()).into();
        assert_eq!(g.spread(), SpreadMode::Repeat);
        assert!(g.is_valid());
    }
}
