use std::sync::Arc;

use crate::coords::Rect;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// CPU-side RGBA8 pixels (sRGB-encoded, premultiplied alpha) shared with the renderer.
///
/// `generation` identifies the content: the renderer re-uploads the texture
/// only when it changes, so producers must bump it whenever pixels change.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
    generation: u64,
}

impl ImageData {
    /// Wraps `pixels`; returns `None` when the buffer does not hold exactly
    /// `width * height` RGBA8 pixels or a dimension is zero.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, generation: u64) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if width == 0 || height == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self { width, height, pixels: pixels.into(), generation })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Draws an image stretched over `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub rect: Rect,
    pub image: ImageData,
}

impl DrawList {
    /// Records an image draw command.
    #[inline]
    pub fn push_image(&mut self, z: ZIndex, rect: Rect, image: ImageData) {
        self.push(z, DrawCmd::Image(ImageCmd { rect, image }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(ImageData::new(2, 2, vec![0; 15], 0).is_none());
        assert!(ImageData::new(0, 2, vec![], 0).is_none());
    }

    #[test]
    fn accepts_exact_buffer() {
        let img = ImageData::new(2, 3, vec![7; 24], 9).expect("valid image");
        assert_eq!((img.width(), img.height(), img.generation()), (2, 3, 9));
        assert_eq!(img.pixels().len(), 24);
    }
}
