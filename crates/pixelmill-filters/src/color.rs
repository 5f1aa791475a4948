use pixelmill_image::Image;

use crate::engine::{color_channels, saturate_i32, PixelTransform};

/// ITU BT.601 luma weights for the grayscale conversion.
const RW: f64 = 0.299;
const GW: f64 = 0.587;
const BW: f64 = 0.114;

/// Tone weights shared by the toning filters and the intensity level
/// scan. Deliberately not the ITU luma weights.
pub(crate) const TONE_RW: f64 = 0.36;
pub(crate) const TONE_GW: f64 = 0.53;
pub(crate) const TONE_BW: f64 = 0.11;

/// Tone intensity of an RGB pixel, truncated to an integer.
pub(crate) fn tone_intensity(pixel: &[u8]) -> i32 {
    (TONE_RW * pixel[0] as f64 + TONE_GW * pixel[1] as f64 + TONE_BW * pixel[2] as f64) as i32
}

/// Invert each color channel: `255 - value`.
///
/// Involutive: applying it twice restores the original image.
#[derive(Debug, Clone, Copy, Default)]
pub struct Invert;

impl<const C: usize> PixelTransform<C> for Invert {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let mut pixel = src.pixel(x, y);
        for ch in 0..color_channels(C) {
            pixel[ch] = 255 - pixel[ch];
        }
        pixel
    }
}

/// Replace each color channel with the ITU BT.601 luma
/// `0.299 R + 0.587 G + 0.114 B`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grayscale;

impl<const C: usize> PixelTransform<C> for Grayscale {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let mut pixel = src.pixel(x, y);
        let intensity =
            (RW * pixel[0] as f64 + GW * pixel[1] as f64 + BW * pixel[2] as f64) as i32;
        for ch in 0..color_channels(C) {
            pixel[ch] = saturate_i32(intensity);
        }
        pixel
    }
}

/// Sepia toning: tone intensity shifted warm per channel (`k = 10`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sepia;

impl<const C: usize> PixelTransform<C> for Sepia {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let mut pixel = src.pixel(x, y);
        let k = 10.0;
        let intensity = tone_intensity(&pixel) as f64;
        pixel[0] = saturate_i32((intensity + 2.0 * k) as i32);
        pixel[1] = saturate_i32((intensity + 0.5 * k) as i32);
        pixel[2] = saturate_i32((intensity - k) as i32);
        pixel
    }
}

/// Pink toning: tone intensity pushed toward red (`k = 50`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Pink;

impl<const C: usize> PixelTransform<C> for Pink {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let mut pixel = src.pixel(x, y);
        let k = 50.0;
        let intensity = tone_intensity(&pixel) as f64;
        pixel[0] = saturate_i32((intensity + 2.0 * k) as i32);
        pixel[1] = saturate_i32((intensity - k) as i32);
        pixel[2] = saturate_i32((intensity - k) as i32);
        pixel
    }
}

/// Add a constant to every color channel, saturating at the range ends.
#[derive(Debug, Clone, Copy)]
pub struct Brightness {
    shift: i32,
}

impl Brightness {
    /// Create a brightness filter adding `shift` to each channel.
    pub fn new(shift: i32) -> Self {
        Self { shift }
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::new(10)
    }
}

impl<const C: usize> PixelTransform<C> for Brightness {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let mut pixel = src.pixel(x, y);
        for ch in 0..color_channels(C) {
            pixel[ch] = saturate_i32(pixel[ch] as i32 + self.shift);
        }
        pixel
    }
}
