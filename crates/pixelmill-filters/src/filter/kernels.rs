use crate::error::FilterError;

/// An odd-width by odd-height grid of convolution weights, indexed by
/// signed offsets from its center cell.
///
/// The weight grid is immutable once constructed; the concrete filters
/// below build their kernels exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    // x-major: weights[(dx + rx) * height + (dy + ry)]
    weights: Vec<f32>,
}

impl Kernel {
    /// Create a kernel from caller-supplied weights.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EvenKernelDimensions`] unless both
    /// dimensions are odd (so a unique center exists), and
    /// [`FilterError::InvalidKernelLength`] when the weight count does
    /// not match `width * height`.
    pub fn new(width: usize, height: usize, weights: Vec<f32>) -> Result<Self, FilterError> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(FilterError::EvenKernelDimensions(width, height));
        }
        if weights.len() != width * height {
            return Err(FilterError::InvalidKernelLength(
                weights.len(),
                width,
                height,
            ));
        }
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// Internal constructor for generated kernels with known-good shape.
    fn from_parts(width: usize, height: usize, weights: Vec<f32>) -> Self {
        debug_assert!(width % 2 == 1 && height % 2 == 1);
        debug_assert_eq!(weights.len(), width * height);
        Self {
            width,
            height,
            weights,
        }
    }

    /// Create a 3x3 kernel from a weight grid, `grid[dx + 1][dy + 1]`.
    pub fn from_grid3(grid: [[f32; 3]; 3]) -> Self {
        let mut weights = Vec::with_capacity(9);
        for column in &grid {
            weights.extend_from_slice(column);
        }
        Self::from_parts(3, 3, weights)
    }

    /// Width of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Horizontal radius, `(width - 1) / 2`.
    pub fn radius_x(&self) -> i64 {
        (self.width as i64 - 1) / 2
    }

    /// Vertical radius, `(height - 1) / 2`.
    pub fn radius_y(&self) -> i64 {
        (self.height as i64 - 1) / 2
    }

    /// Weight at the signed offset `(dx, dy)` from the center cell.
    pub fn weight(&self, dx: i64, dy: i64) -> f32 {
        let ix = (dx + self.radius_x()) as usize;
        let iy = (dy + self.radius_y()) as usize;
        self.weights[ix * self.height + iy]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// Create the 3x3 box blur kernel, every weight `1/9`.
pub fn box_blur() -> Kernel {
    Kernel::from_parts(3, 3, vec![1.0 / 9.0; 9])
}

/// Create a gaussian blur kernel.
///
/// The `(2 * radius + 1)` square grid of `exp(-(i^2 + j^2) / sigma^2)`
/// weights, normalized to sum to one. The engine's historical shape
/// divides by `sigma^2`, not `2 sigma^2`.
///
/// # Arguments
///
/// * `radius` - The kernel radius; the default blur uses 3.
/// * `sigma` - The gaussian spread; the default blur uses 2.
pub fn gaussian(radius: usize, sigma: f32) -> Kernel {
    let size = 2 * radius + 1;
    let r = radius as i64;
    let mut weights = vec![0.0f32; size * size];
    let mut norm = 0.0;

    for i in -r..=r {
        for j in -r..=r {
            let w = (-((i * i + j * j) as f32) / (sigma * sigma)).exp();
            weights[(i + r) as usize * size + (j + r) as usize] = w;
            norm += w;
        }
    }
    weights.iter_mut().for_each(|w| *w /= norm);

    Kernel::from_parts(size, size, weights)
}

/// Create the gaussian kernel with the engine's default radius 3 and
/// sigma 2.
pub fn gaussian_default() -> Kernel {
    gaussian(3, 2.0)
}

/// Create the 3x3 sharpening kernel.
pub fn sharpen() -> Kernel {
    Kernel::from_grid3([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]])
}

/// Create the 3x3 emboss kernel; see [`crate::filter::Emboss`] for the
/// midpoint remap applied on top of the raw convolution.
pub fn emboss() -> Kernel {
    Kernel::from_grid3([[0.0, 1.0, 0.0], [1.0, 0.0, -1.0], [0.0, -1.0, 0.0]])
}

/// Create an `n x n` diagonal motion blur kernel, `weight(i, i) = 1/n`.
///
/// # Errors
///
/// Returns [`FilterError::EvenKernelDimensions`] when `n` is even.
pub fn motion_blur(n: usize) -> Result<Kernel, FilterError> {
    let mut weights = vec![0.0f32; n * n];
    for i in 0..n {
        weights[i * n + i] = 1.0 / n as f32;
    }
    Kernel::new(n, n, weights)
}

/// Create the 3x3 roughness kernel: all weights -1 except center 9.
pub fn roughness() -> Kernel {
    let mut weights = vec![-1.0f32; 9];
    weights[4] = 9.0;
    Kernel::from_parts(3, 3, weights)
}
