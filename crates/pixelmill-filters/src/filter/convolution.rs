use pixelmill_image::Image;

use super::kernels::{self, Kernel};
use crate::engine::{color_channels, saturate_f32, PixelTransform};

/// Per-channel weighted sums of the clamped neighborhood around `(x, y)`.
///
/// Border handling replicates the edge pixel outward; coordinates are
/// never zero-padded or wrapped.
pub(crate) fn convolve_at<const C: usize>(
    src: &Image<C>,
    x: usize,
    y: usize,
    kernel: &Kernel,
) -> [f32; 3] {
    let rx = kernel.radius_x();
    let ry = kernel.radius_y();
    let mut sums = [0.0f32; 3];

    for dy in -ry..=ry {
        for dx in -rx..=rx {
            let neighbor = src.pixel_replicated(x as i64 + dx, y as i64 + dy);
            let weight = kernel.weight(dx, dy);
            for ch in 0..color_channels(C) {
                sums[ch] += neighbor[ch] as f32 * weight;
            }
        }
    }

    sums
}

/// Convolve the image with a [`Kernel`], saturating each channel sum.
///
/// # Examples
///
/// ```
/// use pixelmill_image::{Image, ImageSize};
/// use pixelmill_filters::engine::{apply, NullProgress};
/// use pixelmill_filters::filter::{kernels, Convolution};
///
/// let src = Image::<3>::from_size_val(ImageSize { width: 5, height: 5 }, 90).unwrap();
/// let blur = Convolution::new(kernels::box_blur());
/// let dst = apply(&src, &blur, &mut NullProgress).unwrap().into_image().unwrap();
///
/// // a normalized kernel leaves a uniform image unchanged
/// assert_eq!(dst.get_pixel(2, 2), Ok([90, 90, 90]));
/// ```
#[derive(Debug, Clone)]
pub struct Convolution {
    kernel: Kernel,
}

impl Convolution {
    /// Create a convolution filter over the given kernel.
    pub fn new(kernel: Kernel) -> Self {
        Self { kernel }
    }

    /// The kernel convolved against each neighborhood.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
}

impl<const C: usize> PixelTransform<C> for Convolution {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let sums = convolve_at(src, x, y, &self.kernel);
        let mut pixel = src.pixel(x, y);
        for ch in 0..color_channels(C) {
            pixel[ch] = saturate_f32(sums[ch]);
        }
        pixel
    }
}

/// Emboss: convolve with the emboss kernel, then remap each channel to
/// `(255 + sum) / 2` so the flat response sits at mid-gray.
#[derive(Debug, Clone)]
pub struct Emboss {
    kernel: Kernel,
}

impl Emboss {
    /// Create the emboss filter.
    pub fn new() -> Self {
        Self {
            kernel: kernels::emboss(),
        }
    }
}

impl Default for Emboss {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize> PixelTransform<C> for Emboss {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let sums = convolve_at(src, x, y, &self.kernel);
        let mut pixel = src.pixel(x, y);
        for ch in 0..color_channels(C) {
            pixel[ch] = saturate_f32((255.0 + sums[ch]) / 2.0);
        }
        pixel
    }
}
