use clap::ValueEnum;
use gradia_engine::coords::Vec2;

/// Upper bound of the Rad/Angle parameter.
pub const PARAMETER_MAX: u16 = 720;

/// Pointer distance under which a control point counts as hovered.
pub const HIT_THRESHOLD: f32 = 5.0;

pub const DEFAULT_POINTS: [Vec2; 2] = [Vec2::new(350.0, 300.0), Vec2::new(200.0, 150.0)];

/// Marker color of the control point closest to the pointer.
pub const MARKER_HIGHLIGHT: [u8; 3] = [0x00, 0xFF, 0xFF];
/// Marker color of every other control point.
pub const MARKER_NORMAL: [u8; 3] = [0x00, 0x7F, 0xFF];

/// Which backend draws the canvas.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, ValueEnum)]
pub enum RendererKind {
    /// The gradia wgpu renderer.
    #[default]
    Engine,
    /// CPU rasterizer, uploaded as an image.
    Reference,
}

impl RendererKind {
    pub const ALL: [RendererKind; 2] = [RendererKind::Engine, RendererKind::Reference];

    pub fn label(self) -> &'static str {
        match self {
            RendererKind::Engine => "Engine",
            RendererKind::Reference => "Reference",
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, ValueEnum)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Conic,
}

impl GradientKind {
    pub const ALL: [GradientKind; 3] = [GradientKind::Linear, GradientKind::Radial, GradientKind::Conic];

    /// Number of control points the kind uses.
    pub fn control_point_count(self) -> usize {
        match self {
            GradientKind::Conic => 1,
            GradientKind::Linear | GradientKind::Radial => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GradientKind::Linear => "Linear",
            GradientKind::Radial => "Radial",
            GradientKind::Conic => "Conic",
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, ValueEnum)]
pub enum ExtendMode {
    #[default]
    Pad,
    Repeat,
    Reflect,
}

impl ExtendMode {
    pub const ALL: [ExtendMode; 3] = [ExtendMode::Pad, ExtendMode::Repeat, ExtendMode::Reflect];

    pub fn label(self) -> &'static str {
        match self {
            ExtendMode::Pad => "Pad",
            ExtendMode::Repeat => "Repeat",
            ExtendMode::Reflect => "Reflect",
        }
    }
}

/// One RGB channel of a color stop.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// User-editable gradient settings.
///
/// Both control points are always stored; only the first
/// [`GradientKind::control_point_count`] are active.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientConfig {
    pub kind: GradientKind,
    pub extend_mode: ExtendMode,
    points: [Vec2; 2],
    parameter: u16,
    /// RGB of the stops at offsets 0.0 and 1.0.
    pub stops: [[u8; 3]; 2],
    pub dither: bool,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            extend_mode: ExtendMode::Pad,
            points: DEFAULT_POINTS,
            parameter: PARAMETER_MAX,
            stops: [[0, 0, 0], [255, 255, 255]],
            dither: false,
        }
    }
}

impl GradientConfig {
    /// Offsets of the two color stops.
    pub const STOP_OFFSETS: [f32; 2] = [0.0, 1.0];

    /// Control points the current kind uses.
    #[inline]
    pub fn active_points(&self) -> &[Vec2] {
        &self.points[..self.kind.control_point_count()]
    }

    /// Both stored points, including one hidden by a conic gradient.
    #[inline]
    pub fn stored_points(&self) -> [Vec2; 2] {
        self.points
    }

    /// Moves an active control point. Returns false for inactive indices.
    pub fn set_point(&mut self, index: usize, pos: Vec2) -> bool {
        if index >= self.kind.control_point_count() {
            return false;
        }
        self.points[index] = pos;
        true
    }

    /// Replaces both stored points.
    pub fn set_stored_points(&mut self, points: [Vec2; 2]) {
        self.points = points;
    }

    #[inline]
    pub fn parameter(&self) -> u16 {
        self.parameter
    }

    /// Sets the Rad/Angle parameter, clamped to `0..=PARAMETER_MAX`.
    pub fn set_parameter(&mut self, value: u16) {
        self.parameter = value.min(PARAMETER_MAX);
    }

    /// Parameter as a fraction of a full turn.
    #[inline]
    pub fn turn_fraction(&self) -> f64 {
        f64::from(self.parameter) / f64::from(PARAMETER_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_startup() {
        let c = GradientConfig::default();
        assert_eq!(c.kind, GradientKind::Linear);
        assert_eq!(c.extend_mode, ExtendMode::Pad);
        assert_eq!(c.active_points(), &[Vec2::new(350.0, 300.0), Vec2::new(200.0, 150.0)]);
        assert_eq!(c.parameter(), 720);
        assert_eq!(c.stops, [[0, 0, 0], [255, 255, 255]]);
        assert!(!c.dither);
    }

    #[test]
    fn conic_hides_second_point_without_losing_it() {
        let mut c = GradientConfig::default();
        c.kind = GradientKind::Conic;
        assert_eq!(c.active_points().len(), 1);
        assert!(!c.set_point(1, Vec2::new(1.0, 1.0)));

        c.kind = GradientKind::Radial;
        assert_eq!(c.active_points()[1], Vec2::new(200.0, 150.0));
    }

    #[test]
    fn parameter_is_clamped() {
        let mut c = GradientConfig::default();
        c.set_parameter(9000);
        assert_eq!(c.parameter(), PARAMETER_MAX);
        c.set_parameter(360);
        assert_eq!(c.turn_fraction(), 0.5);
    }

    #[test]
    fn kinds_report_point_counts() {
        assert_eq!(GradientKind::Linear.control_point_count(), 2);
        assert_eq!(GradientKind::Radial.control_point_count(), 2);
        assert_eq!(GradientKind::Conic.control_point_count(), 1);
    }
}
