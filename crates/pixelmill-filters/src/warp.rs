//! Geometric resampling filters.
//!
//! These transforms move the *sampling* coordinate rather than the
//! pixel values: each destination pixel reads one (possibly displaced)
//! source pixel. Out-of-range samples fill with black, except frosted
//! glass which falls back to the undisplaced source pixel.

use std::cell::RefCell;
use std::f64::consts::PI;

use pixelmill_image::Image;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::PixelTransform;

/// Shift the image horizontally by a fixed pixel offset; vacated area
/// fills with black.
#[derive(Debug, Clone, Copy)]
pub struct Shift {
    offset: i64,
}

impl Shift {
    /// Create a shift sampling `offset` pixels to the right.
    pub fn new(offset: i64) -> Self {
        Self { offset }
    }
}

impl Default for Shift {
    fn default() -> Self {
        Self::new(50)
    }
}

impl<const C: usize> PixelTransform<C> for Shift {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        src.pixel_checked(x as i64 + self.offset, y as i64)
            .unwrap_or([0; C])
    }
}

/// Rotate the sampling coordinate about the image center; out-of-range
/// samples (including negative coordinates) fill with black.
#[derive(Debug, Clone, Copy)]
pub struct Rotate {
    angle: f64,
}

impl Rotate {
    /// Create a rotation by `angle` radians.
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }
}

impl Default for Rotate {
    /// The engine's fixed rotation of one radian.
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl<const C: usize> PixelTransform<C> for Rotate {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let cx = (src.width() / 2) as f64;
        let cy = (src.height() / 2) as f64;
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let (sin, cos) = self.angle.sin_cos();
        let sx = (dx * cos - dy * sin + cx) as i64;
        let sy = (dx * sin + dy * cos + cy) as i64;
        src.pixel_checked(sx, sy).unwrap_or([0; C])
    }
}

/// Horizontal wave displacement `x + 20 sin(2 pi y / 60)`; out-of-range
/// samples fill with black.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wave;

impl<const C: usize> PixelTransform<C> for Wave {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let sx = (x as f64 + 20.0 * (2.0 * PI * y as f64 / 60.0).sin()) as i64;
        src.pixel_checked(sx, y as i64).unwrap_or([0; C])
    }
}

/// Frosted glass: jitter the sampling coordinate by up to five pixels
/// on each axis; out-of-range samples fall back to the source pixel
/// itself, not black.
pub struct FrostedGlass {
    rng: RefCell<SmallRng>,
}

impl FrostedGlass {
    /// Create a frosted glass filter seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(SmallRng::from_os_rng()),
        }
    }

    /// Create a deterministically seeded filter, e.g. for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl Default for FrostedGlass {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrostedGlass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("FrostedGlass").finish_non_exhaustive()
    }
}

impl<const C: usize> PixelTransform<C> for FrostedGlass {
    fn compute_pixel(&self, src: &Image<C>, x: usize, y: usize) -> [u8; C] {
        let (dx, dy) = {
            let mut rng = self.rng.borrow_mut();
            (rng.random_range(-5..=5i64), rng.random_range(-5..=5i64))
        };
        src.pixel_checked(x as i64 + dx, y as i64 + dy)
            .unwrap_or_else(|| src.pixel(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{apply, NullProgress};
    use crate::error::FilterError;
    use pixelmill_image::ImageSize;

    fn run<const C: usize>(
        src: &Image<C>,
        transform: &impl PixelTransform<C>,
    ) -> Result<Image<C>, FilterError> {
        Ok(apply(src, transform, &mut NullProgress)?
            .into_image()
            .expect("not cancelled"))
    }

    fn ramp_4x1() -> Image<3> {
        Image::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            vec![10, 10, 10, 20, 20, 20, 30, 30, 30, 40, 40, 40],
        )
        .unwrap()
    }

    #[test]
    fn shift_samples_to_the_right_and_fills_black() -> Result<(), FilterError> {
        let src = ramp_4x1();
        let dst = run(&src, &Shift::new(2))?;
        assert_eq!(dst.get_pixel(0, 0)?, [30, 30, 30]);
        assert_eq!(dst.get_pixel(1, 0)?, [40, 40, 40]);
        assert_eq!(dst.get_pixel(2, 0)?, [0, 0, 0]);
        assert_eq!(dst.get_pixel(3, 0)?, [0, 0, 0]);

        Ok(())
    }

    #[test]
    fn rotate_zero_angle_is_identity() -> Result<(), FilterError> {
        let src = ramp_4x1();
        let dst = run(&src, &Rotate::new(0.0))?;
        assert_eq!(dst, src);

        Ok(())
    }

    #[test]
    fn rotate_rejects_negative_coordinates() -> Result<(), FilterError> {
        // a quarter turn swings most of a wide image off the top edge
        let src = Image::<3>::from_size_val(
            ImageSize {
                width: 9,
                height: 1,
            },
            200,
        )?;
        let dst = run(&src, &Rotate::new(std::f64::consts::FRAC_PI_2))?;
        // x = 0 maps to sample row -4; the explicit signed check makes
        // that black, never a wrapped or truncated read
        assert_eq!(dst.get_pixel(0, 0)?, [0, 0, 0]);

        Ok(())
    }

    #[test]
    fn wave_at_zero_phase_rows_is_identity() -> Result<(), FilterError> {
        // y = 0 and y = 30 have sin(..) = 0, so those rows stay put
        let mut data = Vec::new();
        for y in 0..31u8 {
            for x in 0..3u8 {
                data.extend_from_slice(&[x * 10 + y, 0, 0]);
            }
        }
        let src = Image::<3>::new(
            ImageSize {
                width: 3,
                height: 31,
            },
            data,
        )?;
        let dst = run(&src, &Wave)?;
        for x in 0..3 {
            assert_eq!(dst.get_pixel(x, 0)?, src.get_pixel(x, 0)?);
            assert_eq!(dst.get_pixel(x, 30)?, src.get_pixel(x, 30)?);
        }

        Ok(())
    }

    #[test]
    fn frosted_glass_only_reuses_existing_values() -> Result<(), FilterError> {
        let src = Image::<3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4],
        )?;
        let dst = run(&src, &FrostedGlass::with_seed(7))?;
        // every output pixel is one of the four source pixels, never black
        for &v in dst.as_slice() {
            assert!((1..=4).contains(&v));
        }

        Ok(())
    }

    #[test]
    fn frosted_glass_is_deterministic_under_a_seed() -> Result<(), FilterError> {
        let src = ramp_4x1();
        let a = run(&src, &FrostedGlass::with_seed(42))?;
        let b = run(&src, &FrostedGlass::with_seed(42))?;
        assert_eq!(a, b);

        Ok(())
    }
}
