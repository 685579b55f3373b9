//! Work-queue quadtree decomposition
//!
//! Builds the homogeneous-block decomposition of an intensity grid: regions
//! that fail the homogeneity test split into four quadrants until every
//! block passes or hits the minimal-size floor. An explicit FIFO queue
//! drives the descent, so memory stays bounded by the frontier instead of
//! the call stack, and nodes land in the arena in breadth-first order.

use std::collections::VecDeque;

use image::{GrayImage, Luma};
use log::debug;

use crate::raster::ImageMap;
use crate::segment::region::{Region, ScanMode};

/// Configuration for one segmentation call.
#[derive(Debug, Clone, Copy)]
pub struct SegmentConfig {
    /// Largest `max - min` spread a homogeneous region may have
    pub threshold: u8,
    /// Scan window selection for the homogeneity test
    pub scan_mode: ScanMode,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            threshold: 10,
            scan_mode: ScanMode::RegionOnly,
        }
    }
}

/// One node of a quadtree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadNode {
    /// Grid rectangle this node covers
    pub region: Region,
    /// Arena indices of the four children in top-left, top-right,
    /// bottom-left, bottom-right order; `None` for leaves
    pub children: Option<[usize; 4]>,
}

/// A quadtree over an intensity grid, stored as an index arena.
///
/// The root sits at index 0 and nodes appear in breadth-first discovery
/// order. Like [`Region`], the tree holds no reference to the grid it was
/// built from; pass the same `ImageMap` back in for sampling operations
/// such as [`render_leaves`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quadtree {
    nodes: Vec<QuadNode>,
    depth: u32,
}

impl Quadtree {
    /// The root node covering the whole grid.
    pub fn root(&self) -> &QuadNode {
        &self.nodes[0]
    }

    /// Node at an arena index.
    pub fn node(&self, index: usize) -> &QuadNode {
        &self.nodes[index]
    }

    /// All nodes in breadth-first order.
    pub fn nodes(&self) -> &[QuadNode] {
        &self.nodes
    }

    /// Total node count.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; every tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaf regions in breadth-first order.
    ///
    /// The leaves partition the grid: every coordinate belongs to exactly
    /// one leaf.
    pub fn leaves(&self) -> Vec<Region> {
        self.nodes
            .iter()
            .filter(|node| node.children.is_none())
            .map(|node| node.region)
            .collect()
    }

    /// Number of split levels below the root (0 for a single-node tree).
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Decompose a grid into homogeneous blocks.
///
/// Starts from the full-grid region and repeatedly splits every region
/// whose intensity spread exceeds `config.threshold`, enqueueing children
/// in top-left, top-right, bottom-left, bottom-right order. Termination is
/// guaranteed: each split strictly shrinks both spans, and any region at
/// the minimal-size floor is homogeneous by definition.
///
/// # Arguments
/// * `map` - Intensity grid to decompose
/// * `config` - Homogeneity threshold and scan mode
///
/// # Examples
///
/// ```rust
/// use quadmask::raster::ImageMap;
/// use quadmask::segment::{build_quadtree, SegmentConfig};
///
/// // One dark quadrant on a bright grid splits exactly once
/// let map = ImageMap::from_fn(8, 8, |x, y| {
///     if x < 4 && y < 4 { 0 } else { 255 }
/// }).unwrap();
/// let tree = build_quadtree(&map, &SegmentConfig::default());
/// assert_eq!(tree.len(), 5);
/// assert_eq!(tree.leaves().len(), 4);
/// ```
pub fn build_quadtree(map: &ImageMap, config: &SegmentConfig) -> Quadtree {
    let mut nodes = vec![QuadNode {
        region: Region::full(map),
        children: None,
    }];
    let mut depth = 0;

    let mut queue = VecDeque::new();
    queue.push_back((0usize, 0u32));

    while let Some((index, level)) = queue.pop_front() {
        depth = depth.max(level);

        let region = nodes[index].region;
        if region.is_homogeneous(map, config.threshold, config.scan_mode) {
            continue;
        }

        let first_child = nodes.len();
        for child in region.split() {
            nodes.push(QuadNode {
                region: child,
                children: None,
            });
        }
        nodes[index].children = Some([
            first_child,
            first_child + 1,
            first_child + 2,
            first_child + 3,
        ]);
        for offset in 0..4 {
            queue.push_back((first_child + offset, level + 1));
        }
    }

    debug!(
        "Segmented {}x{} grid into {} nodes, depth {}",
        map.width(),
        map.height(),
        nodes.len(),
        depth
    );
    Quadtree { nodes, depth }
}

/// Render each leaf as a flat block of its mean intensity.
///
/// The classic block-decomposition visualization: homogeneous areas come
/// out as large uniform tiles, busy areas as a fine mosaic. Pass the grid
/// the tree was built from.
pub fn render_leaves(map: &ImageMap, tree: &Quadtree) -> GrayImage {
    let mut image = GrayImage::new(map.width(), map.height());
    for region in tree.leaves() {
        let level = region.mean(map).round() as u8;
        for y in region.y_start..=region.y_end {
            for x in region.x_start..=region.x_end {
                image.put_pixel(x, y, Luma([level]));
            }
        }
    }
    image
}
