use log::debug;
use pixelmill_image::Image;

use super::element::StructuringElement;
use crate::engine::{color_channels, ensure_non_empty, FilterOutcome, ProgressSink};
use crate::error::FilterError;

/// The reduction folded over the gathered neighborhood values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Keep the minimum value (erosion).
    Min,
    /// Keep the maximum value (dilation).
    Max,
}

impl Reduction {
    fn fold(self, acc: u8, value: u8) -> u8 {
        match self {
            Reduction::Min => acc.min(value),
            Reduction::Max => acc.max(value),
        }
    }
}

/// Reduce every pixel neighborhood selected by a structuring element.
///
/// For each pixel the values at offsets whose mask flag is set and which
/// lie strictly inside the image are gathered per channel, and the
/// reduction result becomes the destination channel. Out-of-bounds
/// offsets are dropped, never clamped. When no offset qualifies at all
/// the source pixel is kept unchanged.
///
/// Progress is reported once per column; the cancellation flag is polled
/// right after each report.
pub fn windowed_reduce<const C: usize>(
    src: &Image<C>,
    element: &StructuringElement,
    reduction: Reduction,
    progress: &mut dyn ProgressSink,
) -> Result<FilterOutcome<C>, FilterError> {
    ensure_non_empty(src)?;

    let (cx, cy) = element.center();
    let mut dst = Image::from_size_val(src.size(), 0)?;

    for x in 0..src.width() {
        progress.report((100 * x / src.width()) as u32);
        if progress.is_cancelled() {
            debug!("windowed reduce cancelled at column {x}");
            return Ok(FilterOutcome::Cancelled);
        }
        for y in 0..src.height() {
            let mut pixel = src.pixel(x, y);
            let mut acc: [Option<u8>; 3] = [None; 3];

            for i in 0..element.width() {
                for j in 0..element.height() {
                    if !element.contains(i, j) {
                        continue;
                    }
                    let nx = x as i64 + i as i64 - cx;
                    let ny = y as i64 + j as i64 - cy;
                    let Some(neighbor) = src.pixel_checked(nx, ny) else {
                        continue;
                    };
                    for ch in 0..color_channels(C) {
                        acc[ch] = Some(match acc[ch] {
                            None => neighbor[ch],
                            Some(value) => reduction.fold(value, neighbor[ch]),
                        });
                    }
                }
            }

            for ch in 0..color_channels(C) {
                if let Some(value) = acc[ch] {
                    pixel[ch] = value;
                }
            }
            dst.set_pixel(x, y, pixel)?;
        }
    }

    Ok(FilterOutcome::Complete(dst))
}

/// Erosion: the windowed minimum over the structuring element.
pub fn erode<const C: usize>(
    src: &Image<C>,
    element: &StructuringElement,
    progress: &mut dyn ProgressSink,
) -> Result<FilterOutcome<C>, FilterError> {
    windowed_reduce(src, element, Reduction::Min, progress)
}

/// Dilation: the windowed maximum over the structuring element.
pub fn dilate<const C: usize>(
    src: &Image<C>,
    element: &StructuringElement,
    progress: &mut dyn ProgressSink,
) -> Result<FilterOutcome<C>, FilterError> {
    windowed_reduce(src, element, Reduction::Max, progress)
}

/// Opening: erosion followed by dilation.
///
/// Progress restarts at zero for each constituent pass; a cancelled
/// pass cancels the whole composite.
pub fn open<const C: usize>(
    src: &Image<C>,
    element: &StructuringElement,
    progress: &mut dyn ProgressSink,
) -> Result<FilterOutcome<C>, FilterError> {
    let eroded = match erode(src, element, progress)? {
        FilterOutcome::Complete(image) => image,
        FilterOutcome::Cancelled => return Ok(FilterOutcome::Cancelled),
    };
    dilate(&eroded, element, progress)
}

/// Closing: dilation followed by erosion.
pub fn close<const C: usize>(
    src: &Image<C>,
    element: &StructuringElement,
    progress: &mut dyn ProgressSink,
) -> Result<FilterOutcome<C>, FilterError> {
    let dilated = match dilate(src, element, progress)? {
        FilterOutcome::Complete(image) => image,
        FilterOutcome::Cancelled => return Ok(FilterOutcome::Cancelled),
    };
    erode(&dilated, element, progress)
}

/// Top-hat: `max(0, src - opening(src))` per channel.
pub fn top_hat<const C: usize>(
    src: &Image<C>,
    element: &StructuringElement,
    progress: &mut dyn ProgressSink,
) -> Result<FilterOutcome<C>, FilterError> {
    let opened = match open(src, element, progress)? {
        FilterOutcome::Complete(image) => image,
        FilterOutcome::Cancelled => return Ok(FilterOutcome::Cancelled),
    };
    saturating_difference(src, &opened, progress)
}

/// Black-hat: `max(0, closing(src) - src)` per channel.
pub fn black_hat<const C: usize>(
    src: &Image<C>,
    element: &StructuringElement,
    progress: &mut dyn ProgressSink,
) -> Result<FilterOutcome<C>, FilterError> {
    let closed = match close(src, element, progress)? {
        FilterOutcome::Complete(image) => image,
        FilterOutcome::Cancelled => return Ok(FilterOutcome::Cancelled),
    };
    saturating_difference(&closed, src, progress)
}

/// Morphological gradient: `max(0, dilation(src) - erosion(src))`.
pub fn gradient<const C: usize>(
    src: &Image<C>,
    element: &StructuringElement,
    progress: &mut dyn ProgressSink,
) -> Result<FilterOutcome<C>, FilterError> {
    let eroded = match erode(src, element, progress)? {
        FilterOutcome::Complete(image) => image,
        FilterOutcome::Cancelled => return Ok(FilterOutcome::Cancelled),
    };
    let dilated = match dilate(src, element, progress)? {
        FilterOutcome::Complete(image) => image,
        FilterOutcome::Cancelled => return Ok(FilterOutcome::Cancelled),
    };
    saturating_difference(&dilated, &eroded, progress)
}

/// Per-channel `max(0, lhs - rhs)` as its own progress-reporting pass.
fn saturating_difference<const C: usize>(
    lhs: &Image<C>,
    rhs: &Image<C>,
    progress: &mut dyn ProgressSink,
) -> Result<FilterOutcome<C>, FilterError> {
    debug_assert_eq!(lhs.size(), rhs.size());

    let mut dst = Image::from_size_val(lhs.size(), 0)?;
    for x in 0..lhs.width() {
        progress.report((100 * x / lhs.width()) as u32);
        if progress.is_cancelled() {
            return Ok(FilterOutcome::Cancelled);
        }
        for y in 0..lhs.height() {
            let mut pixel = lhs.pixel(x, y);
            let subtrahend = rhs.pixel(x, y);
            for ch in 0..color_channels(C) {
                pixel[ch] = pixel[ch].saturating_sub(subtrahend[ch]);
            }
            dst.set_pixel(x, y, pixel)?;
        }
    }

    Ok(FilterOutcome::Complete(dst))
}
