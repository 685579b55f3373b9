//! Kernel filtering engine
//!
//! Three stages: a raw convolution core with explicit border policies
//! (`convolve`), a value normalization step that maps signed sums back to
//! 8-bit levels (`scale`), and the boundary call that chains them by kernel
//! name (`pipeline`).

pub mod convolve;
pub mod pipeline;
pub mod scale;

// Re-export key functionality for easier access
pub use convolve::{
    apply_kernel, apply_kernel_gray, filter_plane, BorderPolicy, FilterError, FilterOptions,
};
pub use pipeline::{filter_and_scale, FilterConfig};
pub use scale::{scale, scale_plane, ScalingMethod};
