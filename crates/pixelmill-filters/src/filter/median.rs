use pixelmill_image::Image;

use crate::engine::{color_channels, PixelTransform};

/// Median filter: each channel becomes the middle element of the sorted
/// clamped neighborhood.
///
/// Commonly run before [`crate::edge::GlowingEdges`] to knock out
/// single-pixel noise that would otherwise trip the edge threshold.
#[derive(Debug, Clone, Copy)]
pub struct Median {
    radius: usize,
}

impl Median {
    /// Create a median filter over a `(2 * radius + 1)` square window.
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }
}

impl Default for Median {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<const C: usize> PixelTransform<C> for Median {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let r = self.radius as i64;
        let diameter = 2 * self.radius + 1;
        let mut pixel = src.pixel(x, y);
        let mut window = Vec::with_capacity(diameter * diameter);

        for ch in 0..color_channels(C) {
            window.clear();
            for dx in -r..=r {
                for dy in -r..=r {
                    window.push(src.pixel_replicated(x as i64 + dx, y as i64 + dy)[ch]);
                }
            }
            window.sort_unstable();
            pixel[ch] = window[window.len() / 2];
        }

        pixel
    }
}
