use gradia_engine::coords::Vec2;
use image::Rgba;

/// Coloring outside the `[0, 1]` gradient range.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Spread {
    #[default]
    Pad,
    Repeat,
    Reflect,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stop {
    pub offset: f32,
    pub color: Rgba<u8>,
}

/// Gradient geometry in the rasterizer's own conventions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Linear { start: Vec2, end: Vec2 },
    /// `t = 0` at `focal`, `t = 1` on the circle. The focal point is pulled
    /// inside the circle when it lies outside.
    Radial { center: Vec2, radius: f32, focal: Vec2 },
    /// Sweeps counter-clockwise on screen from `angle_degrees` (0 = +X).
    /// Always repeats once per turn.
    Conical { center: Vec2, angle_degrees: f32 },
}

/// A two-stop gradient evaluated per pixel on the CPU.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Gradient {
    pub shape: Shape,
    pub spread: Spread,
    pub stops: [Stop; 2],
}

const FOCAL_LIMIT: f32 = 0.99;

impl Gradient {
    /// Raw gradient parameter at `p`, before spreading.
    ///
    /// `None` marks degenerate geometry, which paints the last stop.
    pub fn t_at(&self, p: Vec2) -> Option<f32> {
        match self.shape {
            Shape::Linear { start, end } => {
                let axis = end - start;
                let len2 = axis.length_squared();
                if len2 <= f32::EPSILON {
                    return None;
                }
                Some((p - start).dot(axis) / len2)
            }
            Shape::Radial { center, radius, focal } => radial_t(p, center, radius, focal),
            Shape::Conical { center, angle_degrees } => {
                let d = p - center;
                let theta = (-d.y).atan2(d.x).to_degrees();
                Some(((theta - angle_degrees) / 360.0).rem_euclid(1.0))
            }
        }
    }

    /// Color at `p` (logical coordinates).
    pub fn color_at(&self, p: Vec2) -> Rgba<u8> {
        let [first, last] = self.stops;
        let Some(t) = self.t_at(p) else { return last.color };

        let t = match self.shape {
            Shape::Conical { .. } => t,
            _ => apply_spread(t, self.spread),
        };

        let span = last.offset - first.offset;
        let u = if span > f32::EPSILON {
            ((t - first.offset) / span).clamp(0.0, 1.0)
        } else if t < first.offset {
            0.0
        } else {
            1.0
        };
        lerp_color(first.color, last.color, u)
    }
}

fn radial_t(p: Vec2, center: Vec2, radius: f32, focal: Vec2) -> Option<f32> {
    if radius <= 0.0 {
        return None;
    }

    let mut e = focal - center;
    let limit = radius * FOCAL_LIMIT;
    let len = e.length();
    if len > limit {
        e = e * (limit / len);
    }
    let focal = center + e;

    // Solve |e + s·d| = r for s > 0; t = 1 / s.
    let d = p - focal;
    let a = d.length_squared();
    if a <= f32::EPSILON {
        return Some(0.0);
    }
    let b = e.dot(d);
    let c = e.length_squared() - radius * radius;
    let denom = -b + (b * b - a * c).max(0.0).sqrt();
    if denom <= f32::EPSILON {
        return None;
    }
    Some(a / denom)
}

/// Maps a raw parameter into `[0, 1]`.
pub fn apply_spread(t: f32, spread: Spread) -> f32 {
    match spread {
        Spread::Pad => t.clamp(0.0, 1.0),
        Spread::Repeat => t.rem_euclid(1.0),
        Spread::Reflect => {
            let m = t.rem_euclid(2.0);
            if m > 1.0 { 2.0 - m } else { m }
        }
    }
}

/// Interpolates straight sRGB bytes; no gamma handling.
fn lerp_color(a: Rgba<u8>, b: Rgba<u8>, u: f32) -> Rgba<u8> {
    let mix = |x: u8, y: u8| -> u8 { (f32::from(x) + (f32::from(y) - f32::from(x)) * u).round() as u8 };
    Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), mix(a[3], b[3])])
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn gradient(shape: Shape, spread: Spread) -> Gradient {
        Gradient {
            shape,
            spread,
            stops: [Stop { offset: 0.0, color: BLACK }, Stop { offset: 1.0, color: WHITE }],
        }
    }

    fn linear(spread: Spread) -> Gradient {
        gradient(Shape::Linear { start: Vec2::new(0.0, 0.0), end: Vec2::new(100.0, 0.0) }, spread)
    }

    #[test]
    fn linear_interpolates_along_axis() {
        let g = linear(Spread::Pad);
        assert_eq!(g.color_at(Vec2::new(0.0, 40.0)), BLACK);
        assert_eq!(g.color_at(Vec2::new(100.0, -3.0)), WHITE);
        assert_eq!(g.color_at(Vec2::new(50.0, 0.0)), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn pad_clamps_outside_range() {
        let g = linear(Spread::Pad);
        assert_eq!(g.color_at(Vec2::new(-50.0, 0.0)), BLACK);
        assert_eq!(g.color_at(Vec2::new(250.0, 0.0)), WHITE);
    }

    #[test]
    fn spread_modes_fold_parameter() {
        assert!((apply_spread(1.25, Spread::Repeat) - 0.25).abs() < 1e-6);
        assert!((apply_spread(-0.25, Spread::Repeat) - 0.75).abs() < 1e-6);
        assert!((apply_spread(1.25, Spread::Reflect) - 0.75).abs() < 1e-6);
        assert!((apply_spread(-0.25, Spread::Reflect) - 0.25).abs() < 1e-6);
        assert_eq!(apply_spread(7.0, Spread::Pad), 1.0);
    }

    #[test]
    fn degenerate_linear_paints_last_stop() {
        let p = Vec2::new(5.0, 5.0);
        let g = gradient(Shape::Linear { start: p, end: p }, Spread::Repeat);
        assert_eq!(g.t_at(Vec2::zero()), None);
        assert_eq!(g.color_at(Vec2::zero()), WHITE);
    }

    #[test]
    fn radial_with_centered_focal_is_distance_over_radius() {
        let c = Vec2::new(10.0, 10.0);
        let g = gradient(Shape::Radial { center: c, radius: 20.0, focal: c }, Spread::Pad);
        let t = g.t_at(Vec2::new(20.0, 10.0)).expect("valid radial");
        assert!((t - 0.5).abs() < 1e-5);
        assert_eq!(g.t_at(c), Some(0.0));
    }

    #[test]
    fn radial_reaches_one_on_circle_with_offset_focal() {
        let c = Vec2::new(0.0, 0.0);
        let g = gradient(Shape::Radial { center: c, radius: 10.0, focal: Vec2::new(5.0, 0.0) }, Spread::Pad);
        let t = g.t_at(Vec2::new(-10.0, 0.0)).expect("valid radial");
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_radius_paints_last_stop() {
        let c = Vec2::new(0.0, 0.0);
        let g = gradient(Shape::Radial { center: c, radius: 0.0, focal: c }, Spread::Pad);
        assert_eq!(g.color_at(Vec2::new(3.0, 3.0)), WHITE);
    }

    #[test]
    fn conical_sweeps_counter_clockwise_from_start_angle() {
        let c = Vec2::new(0.0, 0.0);
        let g = gradient(Shape::Conical { center: c, angle_degrees: 0.0 }, Spread::Pad);
        // Screen "up" is a quarter turn counter-clockwise.
        let up = g.t_at(Vec2::new(0.0, -10.0)).expect("conic");
        assert!((up - 0.25).abs() < 1e-5);

        let g = gradient(Shape::Conical { center: c, angle_degrees: 180.0 }, Spread::Pad);
        let left = g.t_at(Vec2::new(-10.0, 0.0)).expect("conic");
        let right = g.t_at(Vec2::new(10.0, 0.0)).expect("conic");
        assert!(left.abs() < 1e-5 || (left - 1.0).abs() < 1e-5);
        assert!((right - 0.5).abs() < 1e-5);
    }
}
