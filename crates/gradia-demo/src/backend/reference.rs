use std::path::Path;

use anyhow::{Context, Result};
use gradia_engine::coords::Vec2;
use gradia_engine::scene::ImageData;
use image::Rgba;

use crate::canvas::{Canvas, Marker};
use crate::config::GradientConfig;
use crate::mapping;
use crate::raster::Surface;

/// Uncovered pixels show through in this color.
const BACKGROUND: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// CPU canvas rendering into an RGBA image.
#[derive(Debug, Clone)]
pub struct ReferenceCanvas {
    surface: Surface,
}

impl ReferenceCanvas {
    /// Creates a canvas of `width × height` pixels at `scale` pixels per
    /// logical unit, cleared to the background color.
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        let mut surface = Surface::new(width, height, scale);
        surface.fill(BACKGROUND);
        Self { surface }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Converts the raster into an engine image tagged with `generation`.
    ///
    /// The surface holds straight alpha; engine images are premultiplied.
    pub fn into_image_data(self, generation: u64) -> Option<ImageData> {
        let mut pixels = self.surface.into_image();
        for px in pixels.pixels_mut() {
            premultiply(px);
        }
        let (w, h) = pixels.dimensions();
        ImageData::new(w, h, pixels.into_raw(), generation)
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.surface
            .image()
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        log::info!("snapshot written to {}", path.display());
        Ok(())
    }
}

fn premultiply(px: &mut Rgba<u8>) {
    let a = u16::from(px[3]);
    if a == 255 {
        return;
    }
    for c in &mut px.0[..3] {
        *c = ((u16::from(*c) * a + 127) / 255) as u8;
    }
}

impl Canvas for ReferenceCanvas {
    const MARKER: Marker = Marker::Fill(2.0);

    fn fill_gradient(&mut self, config: &GradientConfig) {
        self.surface.fill_gradient(&mapping::reference_gradient(config));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, [r, g, b]: [u8; 3]) {
        self.surface.stroke_circle(center, radius, 1.0, Rgba([r, g, b, 255]));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, [r, g, b]: [u8; 3]) {
        self.surface.fill_circle(center, radius, Rgba([r, g, b, 255]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_red() {
        let canvas = ReferenceCanvas::new(4, 4, 1.0);
        assert!(canvas.surface().image().pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn markers_are_filled_discs() {
        let mut canvas = ReferenceCanvas::new(10, 10, 1.0);
        canvas.draw_marker(Vec2::new(5.0, 5.0), [0, 127, 255]);
        assert_eq!(*canvas.surface().image().get_pixel(4, 4), Rgba([0, 127, 255, 255]));
    }

    #[test]
    fn image_data_keeps_size_and_generation() {
        let image = ReferenceCanvas::new(3, 2, 1.0).into_image_data(7).expect("non-empty raster");
        assert_eq!((image.width(), image.height(), image.generation()), (3, 2, 7));
        assert_eq!(&image.pixels()[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn image_data_is_premultiplied() {
        let mut px = Rgba([200, 100, 0, 128]);
        premultiply(&mut px);
        assert_eq!(px, Rgba([100, 50, 0, 128]));

        let mut clear = Rgba([255, 255, 255, 0]);
        premultiply(&mut clear);
        assert_eq!(clear, Rgba([0, 0, 0, 0]));
    }
}
