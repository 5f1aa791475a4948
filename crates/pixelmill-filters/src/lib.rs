#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// pointwise color remap filters.
pub mod color;

/// edge and gradient filters.
pub mod edge;

/// the filter driver loop, progress reporting and cancellation.
pub mod engine;

/// two-pass statistical color correction filters.
pub mod enhance;

/// filter error types.
pub mod error;

/// kernel convolution filters.
pub mod filter;

/// morphological operations over structuring elements.
pub mod morphology;

/// the tagged union over every filter kind.
pub mod variant;

/// geometric resampling filters.
pub mod warp;

pub use crate::engine::{apply, FilterOutcome, NullProgress, PixelTransform, ProgressSink};
pub use crate::error::FilterError;
pub use crate::variant::FilterVariant;
