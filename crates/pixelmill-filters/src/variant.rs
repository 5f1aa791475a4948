use pixelmill_image::Image;

use crate::color::{Brightness, Grayscale, Invert, Pink, Sepia};
use crate::edge::{EdgeDecision, GlowingEdges, GradientMagnitude};
use crate::engine::PixelTransform;
use crate::enhance::{Autolevels, GrayWorld, LinearStretch, PerfectReflector, ReferenceColor};
use crate::filter::{Convolution, Emboss, Median};
use crate::warp::{FrostedGlass, Rotate, Shift, Wave};

/// A tagged union over every per-pixel filter kind, so a caller can
/// select a filter at run time while the driver loop stays
/// variant-agnostic.
///
/// Each variant owns its parameters; the two-pass variants can only be
/// built from their measured statistics, so a variant in hand is always
/// ready to run. Construct one per invocation and hand it to
/// [`crate::engine::apply`].
#[derive(Debug)]
pub enum FilterVariant {
    /// Channel inversion.
    Invert(Invert),
    /// ITU luma grayscale.
    Grayscale(Grayscale),
    /// Sepia toning.
    Sepia(Sepia),
    /// Pink toning.
    Pink(Pink),
    /// Constant brightness shift.
    Brightness(Brightness),
    /// Kernel convolution.
    Convolution(Convolution),
    /// Emboss with midpoint remap.
    Emboss(Emboss),
    /// Per-channel median of the neighborhood.
    Median(Median),
    /// Binary black/white edge decision.
    EdgeDecision(EdgeDecision),
    /// Gradient magnitude image.
    GradientMagnitude(GradientMagnitude),
    /// Glowing edges.
    GlowingEdges(GlowingEdges),
    /// Linear contrast stretch from a measured intensity range.
    LinearStretch(LinearStretch),
    /// Per-channel autolevels from measured channel ranges.
    Autolevels(Autolevels),
    /// Gray-world white balance from measured channel means.
    GrayWorld(GrayWorld),
    /// Perfect-reflector white balance from measured channel maxima.
    PerfectReflector(PerfectReflector),
    /// Reference-color correction.
    ReferenceColor(ReferenceColor),
    /// Horizontal shift.
    Shift(Shift),
    /// Rotation about the image center.
    Rotate(Rotate),
    /// Horizontal wave displacement.
    Wave(Wave),
    /// Frosted glass jitter.
    FrostedGlass(FrostedGlass),
}

impl<const C: usize> PixelTransform<C> for FilterVariant {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        match self {
            FilterVariant::Invert(f) => f.compute_pixel(src, x, y),
            FilterVariant::Grayscale(f) => f.compute_pixel(src, x, y),
            FilterVariant::Sepia(f) => f.compute_pixel(src, x, y),
            FilterVariant::Pink(f) => f.compute_pixel(src, x, y),
            FilterVariant::Brightness(f) => f.compute_pixel(src, x, y),
            FilterVariant::Convolution(f) => f.compute_pixel(src, x, y),
            FilterVariant::Emboss(f) => f.compute_pixel(src, x, y),
            FilterVariant::Median(f) => f.compute_pixel(src, x, y),
            FilterVariant::EdgeDecision(f) => f.compute_pixel(src, x, y),
            FilterVariant::GradientMagnitude(f) => f.compute_pixel(src, x, y),
            FilterVariant::GlowingEdges(f) => f.compute_pixel(src, x, y),
            FilterVariant::LinearStretch(f) => f.compute_pixel(src, x, y),
            FilterVariant::Autolevels(f) => f.compute_pixel(src, x, y),
            FilterVariant::GrayWorld(f) => f.compute_pixel(src, x, y),
            FilterVariant::PerfectReflector(f) => f.compute_pixel(src, x, y),
            FilterVariant::ReferenceColor(f) => f.compute_pixel(src, x, y),
            FilterVariant::Shift(f) => f.compute_pixel(src, x, y),
            FilterVariant::Rotate(f) => f.compute_pixel(src, x, y),
            FilterVariant::Wave(f) => f.compute_pixel(src, x, y),
            FilterVariant::FrostedGlass(f) => f.compute_pixel(src, x, y),
        }
    }
}
