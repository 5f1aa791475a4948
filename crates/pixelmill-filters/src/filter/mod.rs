//! Kernel convolution filters
//!
//! This module provides the kernel value type, the fixed kernels of the
//! engine and the convolution-style neighborhood filters.

/// Filter kernels
pub mod kernels;

/// Convolution operations
mod convolution;
pub use convolution::*;

/// Median filter
mod median;
pub use median::*;

pub use kernels::Kernel;
