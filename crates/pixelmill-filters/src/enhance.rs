//! Two-pass statistical color correction filters.
//!
//! Pass one scans the whole source image and produces a statistics
//! value; pass two is an ordinary pixel transform constructed *from*
//! that value, so the scan cannot be skipped or reordered. Statistics
//! that would leave the correction undefined (an empty intensity range,
//! a zero channel average) are rejected when the transform is built,
//! before any pixel work starts.
//!
//! All statistics use integer arithmetic with truncating division.

use log::debug;
use pixelmill_image::Image;

use crate::color::tone_intensity;
use crate::engine::{color_channels, ensure_non_empty, saturate_i32, PixelTransform};
use crate::error::FilterError;

/// Global minimum and maximum tone intensity of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityRange {
    /// Smallest tone intensity seen.
    pub min: i32,
    /// Largest tone intensity seen.
    pub max: i32,
}

impl IntensityRange {
    /// Scan the image for its tone intensity extremes.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptySource`] when the image holds no
    /// pixels.
    pub fn measure<const C: usize>(src: &Image<C>) -> Result<Self, FilterError> {
        ensure_non_empty(src)?;

        let mut min = 255;
        let mut max = 0;
        for x in 0..src.width() {
            for y in 0..src.height() {
                let intensity = tone_intensity(&src.pixel(x, y));
                min = min.min(intensity);
                max = max.max(intensity);
            }
        }
        debug!("measured intensity range [{min}, {max}]");

        Ok(Self { min, max })
    }
}

/// Linear contrast stretch: remap every channel by the global tone
/// intensity range, `(value - min) * 255 / (max - min)`.
#[derive(Debug, Clone, Copy)]
pub struct LinearStretch {
    range: IntensityRange,
}

impl LinearStretch {
    /// Build the stretch from a measured intensity range.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DegenerateStatistics`] when the range is
    /// empty (`max == min`), which would divide by zero.
    pub fn new(range: IntensityRange) -> Result<Self, FilterError> {
        if range.max == range.min {
            return Err(FilterError::DegenerateStatistics(
                "intensity range is empty (max == min)",
            ));
        }
        Ok(Self { range })
    }
}

impl<const C: usize> PixelTransform<C> for LinearStretch {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let mut pixel = src.pixel(x, y);
        let span = self.range.max - self.range.min;
        for ch in 0..color_channels(C) {
            pixel[ch] = saturate_i32((pixel[ch] as i32 - self.range.min) * 255 / span);
        }
        pixel
    }
}

/// Independent per-channel minimum and maximum values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRanges {
    /// Per-channel minima (R, G, B).
    pub min: [i32; 3],
    /// Per-channel maxima (R, G, B).
    pub max: [i32; 3],
}

impl ChannelRanges {
    /// Scan the image for per-channel extremes.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptySource`] when the image holds no
    /// pixels.
    pub fn measure<const C: usize>(src: &Image<C>) -> Result<Self, FilterError> {
        ensure_non_empty(src)?;

        let mut min = [255i32; 3];
        let mut max = [0i32; 3];
        for x in 0..src.width() {
            for y in 0..src.height() {
                let pixel = src.pixel(x, y);
                for ch in 0..color_channels(C) {
                    min[ch] = min[ch].min(pixel[ch] as i32);
                    max[ch] = max[ch].max(pixel[ch] as i32);
                }
            }
        }

        Ok(Self { min, max })
    }
}

/// Autolevels: the linear stretch applied to each channel with its own
/// measured range.
#[derive(Debug, Clone, Copy)]
pub struct Autolevels {
    ranges: ChannelRanges,
}

impl Autolevels {
    /// Build the per-channel stretch from measured channel ranges.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DegenerateStatistics`] when any channel's
    /// range is empty.
    pub fn new(ranges: ChannelRanges) -> Result<Self, FilterError> {
        if ranges.min.iter().zip(ranges.max.iter()).any(|(a, b)| a == b) {
            return Err(FilterError::DegenerateStatistics(
                "channel range is empty (max == min)",
            ));
        }
        Ok(Self { ranges })
    }
}

impl<const C: usize> PixelTransform<C> for Autolevels {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let mut pixel = src.pixel(x, y);
        for ch in 0..color_channels(C) {
            let span = self.ranges.max[ch] - self.ranges.min[ch];
            pixel[ch] = saturate_i32((pixel[ch] as i32 - self.ranges.min[ch]) * 255 / span);
        }
        pixel
    }
}

/// Per-channel averages and the derived gray target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMeans {
    /// Per-channel averages (R, G, B), truncated.
    pub mean: [i32; 3],
    /// Target gray level: the average of the three channel averages.
    pub gray: i32,
}

impl ChannelMeans {
    /// Scan the image for per-channel averages.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptySource`] when the image holds no
    /// pixels.
    pub fn measure<const C: usize>(src: &Image<C>) -> Result<Self, FilterError> {
        ensure_non_empty(src)?;

        let mut sum = [0i64; 3];
        for x in 0..src.width() {
            for y in 0..src.height() {
                let pixel = src.pixel(x, y);
                for ch in 0..color_channels(C) {
                    sum[ch] += pixel[ch] as i64;
                }
            }
        }

        let n = (src.width() * src.height()) as i64;
        let mean = [
            (sum[0] / n) as i32,
            (sum[1] / n) as i32,
            (sum[2] / n) as i32,
        ];
        let gray = (mean[0] + mean[1] + mean[2]) / 3;
        debug!("measured channel means {mean:?}, gray target {gray}");

        Ok(Self { mean, gray })
    }
}

/// Gray-world white balance: scale each channel toward the common gray
/// target, `value * gray / mean`.
#[derive(Debug, Clone, Copy)]
pub struct GrayWorld {
    means: ChannelMeans,
}

impl GrayWorld {
    /// Build the balance from measured channel means.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DegenerateStatistics`] when any channel
    /// average is zero.
    pub fn new(means: ChannelMeans) -> Result<Self, FilterError> {
        if means.mean.contains(&0) {
            return Err(FilterError::DegenerateStatistics(
                "channel average is zero",
            ));
        }
        Ok(Self { means })
    }
}

impl<const C: usize> PixelTransform<C> for GrayWorld {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let mut pixel = src.pixel(x, y);
        for ch in 0..color_channels(C) {
            pixel[ch] = saturate_i32(pixel[ch] as i32 * self.means.gray / self.means.mean[ch]);
        }
        pixel
    }
}

/// Independent per-channel maxima.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMaxima {
    /// Per-channel maxima (R, G, B).
    pub max: [i32; 3],
}

impl ChannelMaxima {
    /// Scan the image for per-channel maxima.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptySource`] when the image holds no
    /// pixels.
    pub fn measure<const C: usize>(src: &Image<C>) -> Result<Self, FilterError> {
        ensure_non_empty(src)?;

        let mut max = [0i32; 3];
        for x in 0..src.width() {
            for y in 0..src.height() {
                let pixel = src.pixel(x, y);
                for ch in 0..color_channels(C) {
                    max[ch] = max[ch].max(pixel[ch] as i32);
                }
            }
        }

        Ok(Self { max })
    }
}

/// Perfect-reflector white balance: scale each channel so its brightest
/// value maps to white, `value * 255 / max`.
#[derive(Debug, Clone, Copy)]
pub struct PerfectReflector {
    maxima: ChannelMaxima,
}

impl PerfectReflector {
    /// Build the balance from measured channel maxima.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DegenerateStatistics`] when any channel
    /// maximum is zero.
    pub fn new(maxima: ChannelMaxima) -> Result<Self, FilterError> {
        if maxima.max.contains(&0) {
            return Err(FilterError::DegenerateStatistics("channel maximum is zero"));
        }
        Ok(Self { maxima })
    }
}

impl<const C: usize> PixelTransform<C> for PerfectReflector {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let mut pixel = src.pixel(x, y);
        for ch in 0..color_channels(C) {
            pixel[ch] = saturate_i32(pixel[ch] as i32 * 255 / self.maxima.max[ch]);
        }
        pixel
    }
}

/// Reference-color correction: scale each channel by the ratio between
/// a target color and a reference color sampled from the source, with
/// no statistics scan.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceColor {
    target: [u8; 3],
    source: [u8; 3],
}

impl ReferenceColor {
    /// Build the correction mapping `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DegenerateStatistics`] when any reference
    /// channel is zero.
    pub fn new(target: [u8; 3], source: [u8; 3]) -> Result<Self, FilterError> {
        if source.contains(&0) {
            return Err(FilterError::DegenerateStatistics(
                "reference channel is zero",
            ));
        }
        Ok(Self { target, source })
    }
}

impl<const C: usize> PixelTransform<C> for ReferenceColor {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let mut pixel = src.pixel(x, y);
        for ch in 0..color_channels(C) {
            pixel[ch] = saturate_i32(
                pixel[ch] as i32 * self.target[ch] as i32 / self.source[ch] as i32,
            );
        }
        pixel
    }
}
