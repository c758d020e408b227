//! Pure functions turning a [`GradientConfig`] into each backend's gradient.

use std::f64::consts::TAU;

use gradia_engine::coords::Vec2;
use gradia_engine::paint::{
    self, Color, ColorStop, ConicGradient, GradientQuality, LinearGradient, RadialGradient, SpreadMode,
};
use image::Rgba;

use crate::config::{ExtendMode, GradientConfig, GradientKind};
use crate::raster;

/// Conic start angle for the engine, in radians.
pub fn engine_angle(config: &GradientConfig) -> f32 {
    (config.turn_fraction() * TAU) as f32
}

/// Conic start angle for the reference rasterizer, in degrees.
pub fn reference_angle(config: &GradientConfig) -> f32 {
    (config.turn_fraction() * 360.0) as f32
}

pub fn engine_spread(mode: ExtendMode) -> SpreadMode {
    match mode {
        ExtendMode::Pad => SpreadMode::Pad,
        ExtendMode::Repeat => SpreadMode::Repeat,
        ExtendMode::Reflect => SpreadMode::Reflect,
    }
}

pub fn reference_spread(mode: ExtendMode) -> raster::Spread {
    match mode {
        ExtendMode::Pad => raster::Spread::Pad,
        ExtendMode::Repeat => raster::Spread::Repeat,
        ExtendMode::Reflect => raster::Spread::Reflect,
    }
}

pub fn engine_quality(config: &GradientConfig) -> GradientQuality {
    if config.dither { GradientQuality::Dither } else { GradientQuality::Smooth }
}

/// Engine gradient with control points shifted by `origin`.
///
/// Engine gradient geometry lives in window space while control points are
/// canvas-local.
pub fn engine_gradient(config: &GradientConfig, origin: Vec2) -> paint::Gradient {
    let stops: Vec<ColorStop> = GradientConfig::STOP_OFFSETS
        .iter()
        .zip(config.stops)
        .map(|(&t, [r, g, b])| ColorStop::new(t, Color::from_rgb8(r, g, b)))
        .collect();
    let spread = engine_spread(config.extend_mode);
    let [p0, p1] = config.stored_points();
    let (p0, p1) = (p0 + origin, p1 + origin);
    let radius = f32::from(config.parameter());

    match config.kind {
        GradientKind::Linear => LinearGradient::new(p0, p1, stops, spread).into(),
        GradientKind::Radial => RadialGradient::new(p0, p1, radius, stops, spread).into(),
        GradientKind::Conic => ConicGradient::new(p0, engine_angle(config), stops).into(),
    }
}

pub fn reference_gradient(config: &GradientConfig) -> raster::Gradient {
    let [p0, p1] = config.stored_points();
    let shape = match config.kind {
        GradientKind::Linear => raster::Shape::Linear { start: p0, end: p1 },
        GradientKind::Radial => raster::Shape::Radial {
            center: p0,
            radius: f32::from(config.parameter()),
            focal: p1,
        },
        GradientKind::Conic => raster::Shape::Conical { center: p0, angle_degrees: reference_angle(config) },
    };
    let stop = |i: usize| {
        let [r, g, b] = config.stops[i];
        raster::Stop { offset: GradientConfig::STOP_OFFSETS[i], color: Rgba([r, g, b, 255]) }
    };

    raster::Gradient { shape, spread: reference_spread(config.extend_mode), stops: [stop(0), stop(1)] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn default_config_is_black_to_white_linear_pad() {
        let config = GradientConfig::default();
        let paint::Gradient::Linear(g) = engine_gradient(&config, Vec2::zero()) else {
            panic!("expected a linear gradient");
        };
        assert_eq!(g.start, Vec2::new(350.0, 300.0));
        assert_eq!(g.end, Vec2::new(200.0, 150.0));
        assert_eq!(g.spread, SpreadMode::Pad);
        assert_eq!(g.stops[0], ColorStop::new(0.0, Color::from_rgb8(0, 0, 0)));
        assert_eq!(g.stops[1], ColorStop::new(1.0, Color::from_rgb8(255, 255, 255)));

        let r = reference_gradient(&config);
        assert_eq!(
            r.shape,
            raster::Shape::Linear { start: Vec2::new(350.0, 300.0), end: Vec2::new(200.0, 150.0) }
        );
        assert_eq!(r.spread, raster::Spread::Pad);
        assert_eq!(r.stops[0].color, Rgba([0, 0, 0, 255]));
        assert_eq!(r.stops[1].color, Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn conic_half_range_is_half_turn_in_each_unit() {
        let mut config = GradientConfig::default();
        config.kind = GradientKind::Conic;
        config.set_parameter(360);

        let paint::Gradient::Conic(g) = engine_gradient(&config, Vec2::zero()) else {
            panic!("expected a conic gradient");
        };
        assert!((g.angle - PI).abs() < 1e-6);
        assert_eq!(g.center, Vec2::new(350.0, 300.0));

        let raster::Shape::Conical { angle_degrees, .. } = reference_gradient(&config).shape else {
            panic!("expected a conical shape");
        };
        assert_eq!(angle_degrees, 180.0);
    }

    #[test]
    fn radial_uses_parameter_as_radius_and_second_point_as_focal() {
        let mut config = GradientConfig::default();
        config.kind = GradientKind::Radial;
        config.extend_mode = ExtendMode::Reflect;
        config.set_parameter(120);

        let paint::Gradient::Radial(g) = engine_gradient(&config, Vec2::new(0.0, 100.0)) else {
            panic!("expected a radial gradient");
        };
        assert_eq!(g.center, Vec2::new(350.0, 400.0));
        assert_eq!(g.focal, Vec2::new(200.0, 250.0));
        assert_eq!(g.radius, 120.0);
        assert_eq!(g.spread, SpreadMode::Reflect);
    }

    #[test]
    fn dither_flag_selects_quality() {
        let mut config = GradientConfig::default();
        assert_eq!(engine_quality(&config), GradientQuality::Smooth);
        config.dither = true;
        assert_eq!(engine_quality(&config), GradientQuality::Dither);
    }

    #[test]
    fn stop_channels_flow_into_both_backends() {
        let mut config = GradientConfig::default();
        config.stops = [[10, 20, 30], [200, 100, 50]];
        let r = reference_gradient(&config);
        assert_eq!(r.stops[0].color, Rgba([10, 20, 30, 255]));
        assert_eq!(r.stops[1].color, Rgba([200, 100, 50, 255]));

        let g = engine_gradient(&config, Vec2::zero());
        assert_eq!(g.stops()[1].color, Color::from_rgb8(200, 100, 50));
    }
}
