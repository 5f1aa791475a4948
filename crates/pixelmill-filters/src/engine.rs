use log::debug;
use pixelmill_image::Image;

use crate::error::FilterError;

/// A progress and cancellation capability owned by the caller.
///
/// The driver loop reports a monotonically non-decreasing percentage in
/// `[0, 100]` once per image column and polls the cancellation flag right
/// after each report. Cancellation is cooperative: the scan finishes its
/// current column before observing the flag.
pub trait ProgressSink {
    /// Receive a progress percentage in `[0, 100]`.
    fn report(&mut self, percent: u32);

    /// Whether the caller has requested cancellation.
    fn is_cancelled(&self) -> bool;
}

/// A sink that discards progress and never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _percent: u32) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A single-pixel transform applied across a whole buffer by [`apply`].
///
/// Implementations read any neighborhood of the source they need, but
/// only ever write the destination pixel they return. Color filters use
/// the first three channels; any further channels (alpha) pass through.
pub trait PixelTransform<const C: usize> {
    /// Compute the destination pixel at `(x, y)`.
    ///
    /// The driver guarantees `(x, y)` is in bounds for `src`.
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C];
}

/// The result of a completed filter invocation.
///
/// Cancellation is a normal alternate termination, not an error: no
/// partial buffer is ever returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome<const C: usize> {
    /// The filter ran to completion and produced a new buffer.
    Complete(Image<C>),
    /// The caller cancelled the run; no output was produced.
    Cancelled,
}

impl<const C: usize> FilterOutcome<C> {
    /// Whether this outcome is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FilterOutcome::Cancelled)
    }

    /// The produced image, or `None` when cancelled.
    pub fn into_image(self) -> Option<Image<C>> {
        match self {
            FilterOutcome::Complete(image) => Some(image),
            FilterOutcome::Cancelled => None,
        }
    }
}

/// Apply a pixel transform across a whole buffer.
///
/// Walks the source column by column, invoking
/// [`PixelTransform::compute_pixel`] for every coordinate and writing the
/// result into a freshly allocated buffer of identical size. Before each
/// column the driver reports `floor(100 * x / width)` to the sink and
/// polls the cancellation flag.
///
/// # Errors
///
/// Returns [`FilterError::EmptySource`] before any work starts when the
/// source holds no pixels.
///
/// # Examples
///
/// ```
/// use pixelmill_image::{Image, ImageSize};
/// use pixelmill_filters::color::Invert;
/// use pixelmill_filters::engine::{apply, NullProgress};
///
/// let src = Image::<3>::from_size_val(ImageSize { width: 4, height: 4 }, 200).unwrap();
/// let outcome = apply(&src, &Invert, &mut NullProgress).unwrap();
/// let dst = outcome.into_image().unwrap();
/// assert_eq!(dst.get_pixel(0, 0), Ok([55, 55, 55]));
/// ```
pub fn apply<T, const C: usize>(
    src: &Image<C>,
    transform: &T,
    progress: &mut dyn ProgressSink,
) -> Result<FilterOutcome<C>, FilterError>
where
    T: PixelTransform<C> + ?Sized,
{
    ensure_non_empty(src)?;

    debug!("filter scan over {}x{} buffer", src.width(), src.height());

    let mut dst = Image::from_size_val(src.size(), 0)?;
    for x in 0..src.width() {
        progress.report((100 * x / src.width()) as u32);
        if progress.is_cancelled() {
            debug!("filter scan cancelled at column {x}");
            return Ok(FilterOutcome::Cancelled);
        }
        for y in 0..src.height() {
            dst.set_pixel(x, y, transform.compute_pixel(src, x, y))?;
        }
    }

    Ok(FilterOutcome::Complete(dst))
}

/// Reject an image with no pixels before any scan starts.
pub(crate) fn ensure_non_empty<const C: usize>(src: &Image<C>) -> Result<(), FilterError> {
    if src.is_empty() {
        return Err(FilterError::EmptySource(src.width(), src.height()));
    }
    Ok(())
}

/// Number of color channels a filter transforms; channels beyond the
/// first three (alpha) pass through untouched.
pub(crate) const fn color_channels(c: usize) -> usize {
    if c < 3 {
        c
    } else {
        3
    }
}

/// Saturate an integer channel sum to the `[0, 255]` range.
pub(crate) fn saturate_i32(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Saturate a float channel sum: truncate toward zero, then clamp.
pub(crate) fn saturate_f32(value: f32) -> u8 {
    saturate_i32(value as i32)
}
