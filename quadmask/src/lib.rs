//! Kernel filtering and quadtree segmentation for raster images.
//!
//! This crate provides the two raster-analysis engines of the toolkit:
//!
//! - **Filtering** ([`filter`]): spatial convolution of an image with a named
//!   3x3 integer kernel from a fixed catalogue ([`kernel`]), with explicit
//!   border-extension policies and repeatable compounding passes, followed by
//!   one normalization step that maps the raw signed sums back onto 8-bit
//!   levels.
//! - **Segmentation** ([`segment`]): quadtree decomposition of a grayscale
//!   intensity grid ([`raster::ImageMap`]) into homogeneous rectangular
//!   blocks by a max - min threshold test, driven by an explicit work queue.
//!
//! Both engines are synchronous, single-threaded and deterministic, and
//! operate purely on in-memory buffers. Image file I/O lives in the
//! `raster_tool` binary, never in the library.

pub mod filter;
pub mod kernel;
pub mod raster;
pub mod segment;

pub use filter::{
    filter_and_scale, BorderPolicy, FilterConfig, FilterError, FilterOptions, ScalingMethod,
};
pub use kernel::{kernel_by_name, Kernel, ALL_KERNELS};
pub use raster::{ImageMap, RasterError, RawPlanes};
pub use segment::{build_quadtree, Quadtree, Region, RegionError, ScanMode, SegmentConfig};
