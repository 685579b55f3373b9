//! In-memory raster containers
//!
//! This module holds the three sample layouts the toolkit moves between:
//! read-only grayscale grids for segmentation, signed multi-plane rasters
//! between filtering passes, and per-channel level histograms for summaries.

pub mod histogram;
pub mod image_map;
pub mod planes;

// Re-export key functionality for easier access
pub use histogram::{Histogram, RgbaHistogram};
pub use image_map::{luminance, ImageMap, RasterError};
pub use planes::{PlaneKind, RawPlanes};
