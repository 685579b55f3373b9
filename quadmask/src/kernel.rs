//! Named integer convolution kernels
//!
//! This module provides the fixed catalogue of kernels the filtering engine
//! accepts: a degenerate 1x1 pass-through, three smoothing masks, a sharpening
//! mask, and six zero-sum edge-detection masks. Every kernel is a `const`
//! record with a unique name; `kernel_by_name` resolves names at runtime via
//! a lazily built index.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;

/// An immutable square integer kernel with a stable catalogue name.
///
/// Weights are stored row-major. The linear dimension is 1 or 3; a 1x1 kernel
/// only uses `weights[0]`. The weight sum is derived once at construction and
/// lets callers classify kernels (zero-sum masks produce signed edge
/// responses, positive-sum masks stay in the input range up to gain).
///
/// # Examples
///
/// ```rust
/// use quadmask::kernel::{kernel_by_name, SOBEL_X};
///
/// assert_eq!(SOBEL_X.size(), 3);
/// assert_eq!(SOBEL_X.sum(), 0);
/// assert_eq!(kernel_by_name("sobel_x"), Some(&SOBEL_X));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    name: &'static str,
    size: u32,
    weights: [i32; 9],
    sum: i32,
}

impl Kernel {
    /// Create a kernel record with a derived weight sum.
    ///
    /// Only the first `size * size` entries of `weights` are meaningful;
    /// the rest must be zero-padded.
    pub const fn new(name: &'static str, size: u32, weights: [i32; 9]) -> Self {
        let count = (size * size) as usize;
        let mut sum = 0;
        let mut i = 0;
        while i < count {
            sum += weights[i];
            i += 1;
        }
        Self {
            name,
            size,
            weights,
            sum,
        }
    }

    /// Stable catalogue name, unique across all kernels.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Linear dimension of the kernel (1 or 3).
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Sum of all weights, derived at construction.
    pub fn sum(&self) -> i32 {
        self.sum
    }

    /// Weight at `(row, col)` in kernel coordinates.
    pub fn weight(&self, row: u32, col: u32) -> i32 {
        self.weights[(row * self.size + col) as usize]
    }

    /// The meaningful weights as a row-major slice of length `size * size`.
    pub fn weights(&self) -> &[i32] {
        &self.weights[..(self.size * self.size) as usize]
    }

    /// True for the degenerate 1x1 pass-through kernel.
    pub fn is_identity(&self) -> bool {
        self.size == 1
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.name, self.size, self.size)
    }
}

/// Degenerate 1x1 pass-through kernel; callers special-case it to skip
/// color conversion.
pub const IDENTITY: Kernel = Kernel::new("identity", 1, [1, 0, 0, 0, 0, 0, 0, 0, 0]);

/// Uniform 3x3 box smoothing mask (sum 9).
pub const SMOOTH_BOX: Kernel = Kernel::new("smooth_box", 3, [1, 1, 1, 1, 1, 1, 1, 1, 1]);

/// Center-weighted cross smoothing mask (sum 8).
pub const SMOOTH_CROSS: Kernel = Kernel::new("smooth_cross", 3, [0, 1, 0, 1, 4, 1, 0, 1, 0]);

/// Binomial smoothing mask approximating a Gaussian (sum 16).
pub const SMOOTH_GAUSS: Kernel = Kernel::new("smooth_gauss", 3, [1, 2, 1, 2, 4, 2, 1, 2, 1]);

/// Cross sharpening mask (sum 1); leaves constant areas unchanged.
pub const SHARPEN: Kernel = Kernel::new("sharpen", 3, [0, -1, 0, -1, 5, -1, 0, -1, 0]);

/// 4-connectivity Laplacian edge mask (sum 0).
pub const LAPLACE_4: Kernel = Kernel::new("laplace_4", 3, [0, 1, 0, 1, -4, 1, 0, 1, 0]);

/// 8-connectivity Laplacian edge mask (sum 0).
pub const LAPLACE_8: Kernel = Kernel::new("laplace_8", 3, [1, 1, 1, 1, -8, 1, 1, 1, 1]);

/// Sobel horizontal-gradient edge mask (sum 0).
pub const SOBEL_X: Kernel = Kernel::new("sobel_x", 3, [-1, 0, 1, -2, 0, 2, -1, 0, 1]);

/// Sobel vertical-gradient edge mask (sum 0).
pub const SOBEL_Y: Kernel = Kernel::new("sobel_y", 3, [-1, -2, -1, 0, 0, 0, 1, 2, 1]);

/// Prewitt horizontal-gradient edge mask (sum 0).
pub const PREWITT_X: Kernel = Kernel::new("prewitt_x", 3, [-1, 0, 1, -1, 0, 1, -1, 0, 1]);

/// Prewitt vertical-gradient edge mask (sum 0).
pub const PREWITT_Y: Kernel = Kernel::new("prewitt_y", 3, [-1, -1, -1, 0, 0, 0, 1, 1, 1]);

/// Every catalogue kernel in presentation order.
pub const ALL_KERNELS: &[Kernel] = &[
    IDENTITY,
    SMOOTH_BOX,
    SMOOTH_CROSS,
    SMOOTH_GAUSS,
    SHARPEN,
    LAPLACE_4,
    LAPLACE_8,
    SOBEL_X,
    SOBEL_Y,
    PREWITT_X,
    PREWITT_Y,
];

static KERNELS_BY_NAME: Lazy<BTreeMap<&'static str, &'static Kernel>> =
    Lazy::new(|| ALL_KERNELS.iter().map(|kernel| (kernel.name, kernel)).collect());

/// Look a catalogue kernel up by its stable name.
///
/// # Arguments
/// * `name` - Catalogue key, e.g. `"laplace_4"`
///
/// # Returns
/// * `Some(&Kernel)` for a known name, `None` otherwise
///
/// # Examples
///
/// ```rust
/// use quadmask::kernel::kernel_by_name;
///
/// assert!(kernel_by_name("smooth_box").is_some());
/// assert!(kernel_by_name("no_such_kernel").is_none());
/// ```
pub fn kernel_by_name(name: &str) -> Option<&'static Kernel> {
    KERNELS_BY_NAME.get(name).copied()
}
