use gradia_engine::coords::Vec2;
use image::{Rgba, RgbaImage};

use super::Gradient;

/// Straight-alpha sRGB pixel buffer addressed in logical coordinates.
///
/// `scale` is the number of pixels per logical unit; geometry is sampled at
/// pixel centers.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    scale: f32,
}

impl Surface {
    /// Creates a transparent surface of `width × height` pixels.
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        Self { pixels: RgbaImage::new(width.max(1), height.max(1)), scale: scale.max(0.01) }
    }

    #[inline]
    fn logical_center(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new((x as f32 + 0.5) / self.scale, (y as f32 + 0.5) / self.scale)
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for px in self.pixels.pixels_mut() {
            *px = color;
        }
    }

    /// Fills every pixel with the gradient, composited source-over.
    pub fn fill_gradient(&mut self, gradient: &Gradient) {
        let (w, h) = self.pixels.dimensions();
        for y in 0..h {
            for x in 0..w {
                let src = gradient.color_at(self.logical_center(x, y));
                blend_over(self.pixels.get_pixel_mut(x, y), src, 1.0);
            }
        }
    }

    /// Anti-aliased filled circle.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba<u8>) {
        self.cover_circle(center, radius, color, |d, r, px| (r - d) / px + 0.5);
    }

    /// Anti-aliased circle outline of `width`, centered on `radius`.
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba<u8>) {
        let half = width * 0.5;
        self.cover_circle(center, radius + half, color, move |d, r, px| {
            let outer = ((r - d) / px + 0.5).clamp(0.0, 1.0);
            let inner = ((r - width - d) / px + 0.5).clamp(0.0, 1.0);
            outer - inner
        });
    }

    fn cover_circle(&mut self, center: Vec2, radius: f32, color: Rgba<u8>, coverage: impl Fn(f32, f32, f32) -> f32) {
        if radius <= 0.0 || !center.is_finite() {
            return;
        }
        let px = 1.0 / self.scale;
        let (w, h) = self.pixels.dimensions();
        let reach = radius + px;

        let x0 = ((center.x - reach) * self.scale).floor().max(0.0) as u32;
        let y0 = ((center.y - reach) * self.scale).floor().max(0.0) as u32;
        let x1 = (((center.x + reach) * self.scale).ceil().max(0.0) as u32).min(w);
        let y1 = (((center.y + reach) * self.scale).ceil().max(0.0) as u32).min(h);

        for y in y0..y1 {
            for x in x0..x1 {
                let d = self.logical_center(x, y).distance(center);
                let cov = coverage(d, radius, px).clamp(0.0, 1.0);
                if cov > 0.0 {
                    blend_over(self.pixels.get_pixel_mut(x, y), color, cov);
                }
            }
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

/// Source-over on straight-alpha bytes, with `coverage` scaling source alpha.
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let sa = f32::from(src[3]) / 255.0 * coverage;
    if sa >= 1.0 {
        *dst = src;
        return;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    let channel = |s: u8, d: u8| -> u8 {
        let v = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Shape, Spread, Stop};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn fill_covers_every_pixel() {
        let mut s = Surface::new(3, 2, 1.0);
        s.fill(RED);
        assert!(s.image().pixels().all(|p| *p == RED));
    }

    #[test]
    fn filled_circle_covers_center_but_not_corners() {
        let mut s = Surface::new(20, 20, 1.0);
        s.fill(RED);
        s.fill_circle(Vec2::new(10.0, 10.0), 2.0, BLUE);
        assert_eq!(*s.image().get_pixel(10, 10), BLUE);
        assert_eq!(*s.image().get_pixel(0, 0), RED);
    }

    #[test]
    fn stroked_circle_leaves_center_untouched() {
        let mut s = Surface::new(20, 20, 1.0);
        s.fill(RED);
        s.stroke_circle(Vec2::new(10.0, 10.0), 3.0, 1.0, BLUE);
        assert_eq!(*s.image().get_pixel(9, 9), RED);
        // Pixel center (13.5, 10.5) is 3.54 from the center, inside the ring.
        assert_ne!(*s.image().get_pixel(13, 10), RED);
    }

    #[test]
    fn scale_maps_pixels_to_logical_units() {
        let mut s = Surface::new(4, 4, 2.0);

        let black = Rgba([0, 0, 0, 255]);
        let white = Rgba([255, 255, 255, 255]);
        s.fill_gradient(&Gradient {
            shape: Shape::Linear { start: Vec2::new(0.0, 0.0), end: Vec2::new(2.0, 0.0) },
            spread: Spread::Pad,
            stops: [Stop { offset: 0.0, color: black }, Stop { offset: 1.0, color: white }],
        });
        // Pixel 3 samples logical x = 1.75.
        assert_eq!(s.image().get_pixel(3, 0)[0], 223);
    }

    #[test]
    fn partial_coverage_blends() {
        let mut dst = RED;
        blend_over(&mut dst, BLUE, 0.5);
        assert_eq!(dst, Rgba([128, 0, 128, 255]));
    }
}
