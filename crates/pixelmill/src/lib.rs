#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use pixelmill_image as image;

#[doc(inline)]
pub use pixelmill_filters as filters;
