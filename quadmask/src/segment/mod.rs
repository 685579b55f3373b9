//! Quadtree region segmentation
//!
//! This module decomposes a grayscale intensity grid into homogeneous
//! rectangular blocks: a region whose intensity spread exceeds a threshold
//! splits into four quadrants, and the descent repeats until every block
//! passes the test or reaches the minimal-size floor.

pub mod quadtree;
pub mod region;

// Re-export key functionality for easier access
pub use quadtree::{build_quadtree, render_leaves, QuadNode, Quadtree, SegmentConfig};
pub use region::{Region, RegionError, ScanMode};
