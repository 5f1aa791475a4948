use pixelmill_image::ImageError;

/// An error type for filter construction and execution.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    /// Error when a filter is invoked on an image with no pixels.
    #[error("Source image is empty ({0}x{1})")]
    EmptySource(usize, usize),

    /// Error when kernel dimensions are even, so no center cell exists.
    #[error("Kernel dimensions must be odd, got {0}x{1}")]
    EvenKernelDimensions(usize, usize),

    /// Error when the kernel weight count does not match its dimensions.
    #[error("Kernel weight count ({0}) does not match {1}x{2}")]
    InvalidKernelLength(usize, usize, usize),

    /// Error when the structuring element mask does not match its dimensions.
    #[error("Structuring element mask length ({0}) does not match {1}x{2}")]
    InvalidElementLength(usize, usize, usize),

    /// Error when measured image statistics leave a correction undefined,
    /// e.g. a zero-width intensity range or a zero channel average.
    #[error("Degenerate image statistics: {0}")]
    DegenerateStatistics(&'static str),

    /// Error bubbled up from the underlying image buffer.
    #[error(transparent)]
    Image(#[from] ImageError),
}
