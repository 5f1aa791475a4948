//! Edge and gradient filters.
//!
//! Every filter here convolves a pair of fixed 3x3 directional kernels
//! against the clamped neighborhood and combines the horizontal and
//! vertical responses, either into a binary decision or a magnitude.

use pixelmill_image::Image;

use crate::engine::{color_channels, saturate_f32, PixelTransform};

/// A pair of 3x3 directional kernels, `kx[dx + 1][dy + 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientKernels {
    /// Horizontal response kernel.
    pub kx: [[f32; 3]; 3],
    /// Vertical response kernel.
    pub ky: [[f32; 3]; 3],
}

/// The Sobel kernel pair.
pub const SOBEL: GradientKernels = GradientKernels {
    kx: [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]],
    ky: [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]],
};

/// The Prewitt kernel pair.
pub const PREWITT: GradientKernels = GradientKernels {
    kx: [[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]],
    ky: [[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
};

/// The Scharr kernel pair.
pub const SCHARR: GradientKernels = GradientKernels {
    kx: [[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]],
    ky: [[-3.0, -10.0, -3.0], [0.0, 0.0, 0.0], [3.0, 10.0, 3.0]],
};

/// Squared-magnitude threshold for the binary edge decision.
const DECISION_THRESHOLD: f32 = 128.0 * 128.0;

/// Per-channel horizontal and vertical gradient responses at `(x, y)`,
/// with the border replicated as in kernel convolution.
fn gradient_at<const C: usize>(
    src: &Image<C>,
    x: usize,
    y: usize,
    kernels: &GradientKernels,
) -> ([f32; 3], [f32; 3]) {
    let mut gx = [0.0f32; 3];
    let mut gy = [0.0f32; 3];

    for l in -1..=1i64 {
        for k in -1..=1i64 {
            let neighbor = src.pixel_replicated(x as i64 + k, y as i64 + l);
            let wx = kernels.kx[(k + 1) as usize][(l + 1) as usize];
            let wy = kernels.ky[(k + 1) as usize][(l + 1) as usize];
            for ch in 0..color_channels(C) {
                gx[ch] += neighbor[ch] as f32 * wx;
                gy[ch] += neighbor[ch] as f32 * wy;
            }
        }
    }

    (gx, gy)
}

/// Whether any color channel's squared gradient magnitude trips the
/// decision threshold. One combined decision, not per channel.
fn trips_threshold(gx: &[f32; 3], gy: &[f32; 3], channels: usize) -> bool {
    (0..channels).any(|ch| gx[ch] * gx[ch] + gy[ch] * gy[ch] > DECISION_THRESHOLD)
}

/// Binary edge decision: pure black where any channel's gradient trips
/// the `128^2` threshold, pure white elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDecision {
    kernels: GradientKernels,
}

impl EdgeDecision {
    /// Create the decision filter over the given kernel pair.
    pub fn new(kernels: GradientKernels) -> Self {
        Self { kernels }
    }

    /// The Sobel variant.
    pub fn sobel() -> Self {
        Self::new(SOBEL)
    }

    /// The Prewitt variant.
    pub fn prewitt() -> Self {
        Self::new(PREWITT)
    }

    /// The Scharr variant.
    pub fn scharr() -> Self {
        Self::new(SCHARR)
    }
}

impl<const C: usize> PixelTransform<C> for EdgeDecision {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let (gx, gy) = gradient_at(src, x, y, &self.kernels);
        let value = if trips_threshold(&gx, &gy, color_channels(C)) {
            0
        } else {
            255
        };
        let mut pixel = src.pixel(x, y);
        for ch in 0..color_channels(C) {
            pixel[ch] = value;
        }
        pixel
    }
}

/// Gradient magnitude image: per channel `clamp(sqrt(gx^2 + gy^2))`,
/// no thresholding.
#[derive(Debug, Clone, Copy)]
pub struct GradientMagnitude {
    kernels: GradientKernels,
}

impl GradientMagnitude {
    /// Create the magnitude filter over the given kernel pair.
    pub fn new(kernels: GradientKernels) -> Self {
        Self { kernels }
    }

    /// The Scharr variant, the engine's boundary-image default.
    pub fn scharr() -> Self {
        Self::new(SCHARR)
    }
}

impl<const C: usize> PixelTransform<C> for GradientMagnitude {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let (gx, gy) = gradient_at(src, x, y, &self.kernels);
        let mut pixel = src.pixel(x, y);
        for ch in 0..color_channels(C) {
            pixel[ch] = saturate_f32((gx[ch] * gx[ch] + gy[ch] * gy[ch]).sqrt());
        }
        pixel
    }
}

/// Glowing edges: where the Sobel decision trips, output the brightest
/// neighborhood value per channel; elsewhere output black.
///
/// Usually chained after a [`crate::filter::Median`] pre-pass so noise
/// does not light up.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlowingEdges;

impl<const C: usize> PixelTransform<C> for GlowingEdges {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let (gx, gy) = gradient_at(src, x, y, &SOBEL);

        let mut brightest = [0u8; 3];
        for l in -1..=1i64 {
            for k in -1..=1i64 {
                let neighbor = src.pixel_replicated(x as i64 + k, y as i64 + l);
                for ch in 0..color_channels(C) {
                    brightest[ch] = brightest[ch].max(neighbor[ch]);
                }
            }
        }

        let mut pixel = src.pixel(x, y);
        let edge = trips_threshold(&gx, &gy, color_channels(C));
        for ch in 0..color_channels(C) {
            pixel[ch] = if edge { brightest[ch] } else { 0 };
        }
        pixel
    }
}
