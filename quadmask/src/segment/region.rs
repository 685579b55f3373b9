//! Rectangular grid regions for quadtree segmentation.
//!
//! This module provides the `Region` value the segmentation layer works in:
//! an inclusive rectangle of grid coordinates with homogeneity testing and
//! four-way splitting. Regions are plain indices into a grid they do not
//! own; the `ImageMap` under inspection is borrowed at each call so that one
//! grid can back any number of live regions.
//!
//! # Coordinate System
//!
//! - **x-axis (columns)**: increases rightward from the left edge
//! - **y-axis (rows)**: increases downward from the top edge
//! - **Bounds**: both start and end coordinates are inclusive
//!
//! # Examples
//!
//! ```rust
//! use quadmask::raster::ImageMap;
//! use quadmask::segment::{Region, ScanMode};
//!
//! let map = ImageMap::from_fn(8, 8, |x, _| if x < 4 { 10 } else { 200 }).unwrap();
//! let root = Region::full(&map);
//!
//! // Half dark, half bright: far from homogeneous at threshold 10
//! assert!(!root.is_homogeneous(&map, 10, ScanMode::RegionOnly));
//!
//! // Each half on its own is perfectly uniform
//! let [top_left, top_right, _, _] = root.split();
//! assert!(top_left.is_homogeneous(&map, 0, ScanMode::RegionOnly));
//! assert!(top_right.is_homogeneous(&map, 0, ScanMode::RegionOnly));
//! ```

use thiserror::Error;

use crate::raster::ImageMap;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegionError {
    #[error("Region bounds inverted: x {x_start}..{x_end}, y {y_start}..{y_end}")]
    InvertedBounds {
        x_start: u32,
        x_end: u32,
        y_start: u32,
        y_end: u32,
    },

    #[error("Region corner ({x_end}, {y_end}) lies outside a {width}x{height} grid")]
    OutOfBounds {
        x_end: u32,
        y_end: u32,
        width: u32,
        height: u32,
    },
}

/// Which samples a homogeneity test inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Scan the window anchored at the grid origin whose far corner is the
    /// region's far corner, i.e. `(0, 0)..=(x_end, y_end)`. This window
    /// contains the region's own window, so an origin-anchored pass only
    /// deems a region homogeneous when everything up to its far corner is.
    FromOrigin,
    /// Scan exactly the region's own samples,
    /// `(x_start, y_start)..=(x_end, y_end)`.
    RegionOnly,
}

/// An inclusive rectangle of grid coordinates.
///
/// Carries no reference to the grid it indexes; every sampling operation
/// borrows the `ImageMap` the region was validated against. Constructed
/// through [`Region::full`] or [`Region::new`], or by [`Region::split`],
/// all of which uphold `x_start <= x_end` and `y_start <= y_end`.
///
/// # Examples
///
/// ```rust
/// use quadmask::raster::ImageMap;
/// use quadmask::segment::Region;
///
/// let map = ImageMap::from_fn(16, 8, |x, y| (x + y) as u8).unwrap();
/// let region = Region::new(&map, 4, 11, 2, 5).unwrap();
/// assert_eq!(region.width(), 8);
/// assert_eq!(region.height(), 4);
/// assert_eq!(region.size(), 7 * 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge (inclusive)
    pub x_start: u32,
    /// Right edge (inclusive)
    pub x_end: u32,
    /// Top edge (inclusive)
    pub y_start: u32,
    /// Bottom edge (inclusive)
    pub y_end: u32,
}

impl Region {
    /// Create a region after validating ordering and containment.
    ///
    /// # Arguments
    /// * `map` - Grid the bounds must lie inside
    /// * `x_start` - Left edge (inclusive)
    /// * `x_end` - Right edge (inclusive)
    /// * `y_start` - Top edge (inclusive)
    /// * `y_end` - Bottom edge (inclusive)
    ///
    /// # Returns
    /// * The region, or `RegionError::InvertedBounds` when an end precedes
    ///   its start, or `RegionError::OutOfBounds` when the far corner falls
    ///   outside the grid
    pub fn new(
        map: &ImageMap,
        x_start: u32,
        x_end: u32,
        y_start: u32,
        y_end: u32,
    ) -> Result<Self, RegionError> {
        if x_start > x_end || y_start > y_end {
            return Err(RegionError::InvertedBounds {
                x_start,
                x_end,
                y_start,
                y_end,
            });
        }
        if x_end >= map.width() || y_end >= map.height() {
            return Err(RegionError::OutOfBounds {
                x_end,
                y_end,
                width: map.width(),
                height: map.height(),
            });
        }
        Ok(Self {
            x_start,
            x_end,
            y_start,
            y_end,
        })
    }

    /// The root region covering an entire grid.
    pub fn full(map: &ImageMap) -> Self {
        // ImageMap construction guarantees nonzero dimensions
        Self {
            x_start: 0,
            x_end: map.width() - 1,
            y_start: 0,
            y_end: map.height() - 1,
        }
    }

    /// Span-product size, `(x_end - x_start) * (y_end - y_start)`.
    ///
    /// This is an area over coordinate *spans*, deliberately not the pixel
    /// count: a single row or column has size 0, and the 2x2 pixel square
    /// has size 1. The homogeneity floor (`size() <= 4`) is defined on this
    /// metric. See [`Region::width`] and [`Region::height`] for the pixel
    /// counts.
    pub fn size(&self) -> u64 {
        u64::from(self.x_end - self.x_start) * u64::from(self.y_end - self.y_start)
    }

    /// Pixel count along x.
    pub fn width(&self) -> u32 {
        self.x_end - self.x_start + 1
    }

    /// Pixel count along y.
    pub fn height(&self) -> u32 {
        self.y_end - self.y_start + 1
    }

    /// Test whether this region's intensity spread stays within `threshold`.
    ///
    /// Regions with `size() <= 4` are homogeneous unconditionally, whatever
    /// their samples hold; this floor is what terminates a quadtree descent.
    /// Larger regions scan the window `mode` selects and compare the
    /// observed `max - min` against the threshold.
    ///
    /// # Arguments
    /// * `map` - Grid the region was built against
    /// * `threshold` - Largest acceptable `max - min` spread
    /// * `mode` - Scan window selection, see [`ScanMode`]
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quadmask::raster::ImageMap;
    /// use quadmask::segment::{Region, ScanMode};
    ///
    /// let map = ImageMap::from_fn(6, 6, |x, _| (x * 10) as u8).unwrap();
    /// let root = Region::full(&map);
    /// // Spread is 50: homogeneous exactly from threshold 50 upward
    /// assert!(!root.is_homogeneous(&map, 49, ScanMode::RegionOnly));
    /// assert!(root.is_homogeneous(&map, 50, ScanMode::RegionOnly));
    /// ```
    pub fn is_homogeneous(&self, map: &ImageMap, threshold: u8, mode: ScanMode) -> bool {
        if self.size() <= 4 {
            return true;
        }

        let (x_first, y_first) = match mode {
            ScanMode::FromOrigin => (0, 0),
            ScanMode::RegionOnly => (self.x_start, self.y_start),
        };

        let mut min = u8::MAX;
        let mut max = u8::MIN;
        for y in y_first..=self.y_end {
            for x in x_first..=self.x_end {
                let sample = map.gray(x, y);
                min = min.min(sample);
                max = max.max(sample);
            }
        }
        max - min <= threshold
    }

    /// Split into four quadrants: top-left, top-right, bottom-left,
    /// bottom-right.
    ///
    /// Midpoints round down (`x_mid = x_start + (x_end - x_start) / 2`), the
    /// low half keeps the midpoint, and the high half starts one past it.
    /// The children partition the parent exactly: every parent coordinate
    /// lands in exactly one child.
    ///
    /// Both spans must be at least 1. A region with a zero span has
    /// `size() == 0` and is caught by the homogeneity floor before any
    /// caller could split it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quadmask::raster::ImageMap;
    /// use quadmask::segment::Region;
    ///
    /// let map = ImageMap::from_fn(8, 8, |_, _| 0).unwrap();
    /// let [tl, tr, bl, br] = Region::full(&map).split();
    /// assert_eq!((tl.x_start, tl.x_end, tl.y_start, tl.y_end), (0, 3, 0, 3));
    /// assert_eq!((tr.x_start, tr.x_end), (4, 7));
    /// assert_eq!((bl.y_start, bl.y_end), (4, 7));
    /// assert_eq!((br.x_start, br.y_start), (4, 4));
    /// ```
    pub fn split(&self) -> [Region; 4] {
        debug_assert!(
            self.x_end > self.x_start && self.y_end > self.y_start,
            "split requires both spans >= 1"
        );
        let x_mid = self.x_start + (self.x_end - self.x_start) / 2;
        let y_mid = self.y_start + (self.y_end - self.y_start) / 2;

        [
            Region {
                x_start: self.x_start,
                x_end: x_mid,
                y_start: self.y_start,
                y_end: y_mid,
            },
            Region {
                x_start: x_mid + 1,
                x_end: self.x_end,
                y_start: self.y_start,
                y_end: y_mid,
            },
            Region {
                x_start: self.x_start,
                x_end: x_mid,
                y_start: y_mid + 1,
                y_end: self.y_end,
            },
            Region {
                x_start: x_mid + 1,
                x_end: self.x_end,
                y_start: y_mid + 1,
                y_end: self.y_end,
            },
        ]
    }

    /// Mean intensity over the region's own samples.
    pub fn mean(&self, map: &ImageMap) -> f64 {
        let mut sum: u64 = 0;
        for y in self.y_start..=self.y_end {
            for x in self.x_start..=self.x_end {
                sum += u64::from(map.gray(x, y));
            }
        }
        let samples = u64::from(self.width()) * u64::from(self.height());
        sum as f64 / samples as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gradient_map() -> ImageMap {
        ImageMap::from_fn(8, 8, |x, y| (x * 10 + y) as u8).unwrap()
    }

    #[test]
    fn test_new_validates_ordering() {
        let map = gradient_map();
        assert!(matches!(
            Region::new(&map, 5, 2, 0, 7),
            Err(RegionError::InvertedBounds { x_start: 5, x_end: 2, .. })
        ));
        assert!(matches!(
            Region::new(&map, 0, 7, 6, 1),
            Err(RegionError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn test_new_validates_containment() {
        let map = gradient_map();
        assert!(matches!(
            Region::new(&map, 0, 8, 0, 7),
            Err(RegionError::OutOfBounds {
                x_end: 8,
                width: 8,
                ..
            })
        ));
        assert!(matches!(
            Region::new(&map, 0, 7, 0, 9),
            Err(RegionError::OutOfBounds { y_end: 9, .. })
        ));
        assert!(Region::new(&map, 0, 7, 0, 7).is_ok());
    }

    #[test]
    fn test_full_covers_grid() {
        let map = ImageMap::from_fn(8, 6, |_, _| 0).unwrap();
        let root = Region::full(&map);
        assert_eq!((root.x_start, root.x_end), (0, 7));
        assert_eq!((root.y_start, root.y_end), (0, 5));
        assert_eq!(root.width(), 8);
        assert_eq!(root.height(), 6);
        assert_eq!(root.size(), 7 * 5);
    }

    #[test]
    fn test_size_is_span_product() {
        let map = gradient_map();
        // 4x4 pixel block spans 3 in each direction
        let block = Region::new(&map, 0, 3, 0, 3).unwrap();
        assert_eq!(block.size(), 9);
        // Single row: zero size despite 8 pixels
        let row = Region::new(&map, 0, 7, 3, 3).unwrap();
        assert_eq!(row.size(), 0);
        assert_eq!(row.width(), 8);
    }

    #[test]
    fn test_minimal_regions_always_homogeneous() {
        // Alternating extremes, as far from uniform as a grid gets
        let map = ImageMap::from_fn(8, 8, |x, y| if (x + y) % 2 == 0 { 0 } else { 255 }).unwrap();

        // 3x3 pixels: spans 2 and 2, size 4, still under the floor
        let floor = Region::new(&map, 0, 2, 0, 2).unwrap();
        assert!(floor.is_homogeneous(&map, 0, ScanMode::RegionOnly));

        // Single column: size 0
        let column = Region::new(&map, 4, 4, 0, 7).unwrap();
        assert!(column.is_homogeneous(&map, 0, ScanMode::RegionOnly));

        // One pixel more in each direction leaves the floor
        let above = Region::new(&map, 0, 3, 0, 2).unwrap();
        assert_eq!(above.size(), 6);
        assert!(!above.is_homogeneous(&map, 0, ScanMode::RegionOnly));
    }

    #[test]
    fn test_homogeneity_monotone_in_threshold() {
        let map = gradient_map();
        let root = Region::full(&map);
        let mut seen_homogeneous = false;
        for threshold in 0..=255u16 {
            let homogeneous = root.is_homogeneous(&map, threshold as u8, ScanMode::RegionOnly);
            if seen_homogeneous {
                assert!(homogeneous, "lost homogeneity at threshold {threshold}");
            }
            seen_homogeneous |= homogeneous;
        }
        assert!(seen_homogeneous);
        // Spread of the x*10+y gradient over 8x8 is 70+7
        assert!(!root.is_homogeneous(&map, 76, ScanMode::RegionOnly));
        assert!(root.is_homogeneous(&map, 77, ScanMode::RegionOnly));
    }

    #[test]
    fn test_scan_modes_diverge() {
        // Uniform except for one dark sample at the origin
        let map = ImageMap::from_fn(8, 8, |x, y| if x == 0 && y == 0 { 0 } else { 100 }).unwrap();
        let region = Region::new(&map, 2, 5, 2, 5).unwrap();
        assert_eq!(region.size(), 9);

        assert!(region.is_homogeneous(&map, 10, ScanMode::RegionOnly));
        // The origin-anchored window picks up the dark corner sample
        assert!(!region.is_homogeneous(&map, 10, ScanMode::FromOrigin));
    }

    #[test]
    fn test_origin_window_contains_region_window() {
        // FromOrigin scans a superset of RegionOnly, so origin-homogeneity
        // must imply region-homogeneity on any grid
        let map = gradient_map();
        for (x_start, y_start) in [(0, 0), (2, 1), (4, 4)] {
            let region = Region::new(&map, x_start, 7, y_start, 7).unwrap();
            for threshold in [0u8, 30, 77, 255] {
                if region.is_homogeneous(&map, threshold, ScanMode::FromOrigin) {
                    assert!(region.is_homogeneous(&map, threshold, ScanMode::RegionOnly));
                }
            }
        }
    }

    #[test]
    fn test_split_partitions_parent() {
        let map = ImageMap::from_fn(7, 5, |_, _| 0).unwrap();
        let parent = Region::full(&map);
        let children = parent.split();

        // Expected quadrants for x span 6 (mid 3) and y span 4 (mid 2)
        assert_eq!(children[0], Region { x_start: 0, x_end: 3, y_start: 0, y_end: 2 });
        assert_eq!(children[1], Region { x_start: 4, x_end: 6, y_start: 0, y_end: 2 });
        assert_eq!(children[2], Region { x_start: 0, x_end: 3, y_start: 3, y_end: 4 });
        assert_eq!(children[3], Region { x_start: 4, x_end: 6, y_start: 3, y_end: 4 });

        // Every parent coordinate lands in exactly one child
        for y in parent.y_start..=parent.y_end {
            for x in parent.x_start..=parent.x_end {
                let owners = children
                    .iter()
                    .filter(|child| {
                        x >= child.x_start
                            && x <= child.x_end
                            && y >= child.y_start
                            && y <= child.y_end
                    })
                    .count();
                assert_eq!(owners, 1, "coordinate ({x}, {y}) owned {owners} times");
            }
        }
    }

    #[test]
    fn test_split_two_by_two() {
        let map = ImageMap::from_fn(2, 2, |_, _| 0).unwrap();
        let children = Region::full(&map).split();
        for (index, child) in children.iter().enumerate() {
            assert_eq!(child.width(), 1, "child {index}");
            assert_eq!(child.height(), 1, "child {index}");
            assert_eq!(child.size(), 0);
        }
        assert_eq!(children[3], Region { x_start: 1, x_end: 1, y_start: 1, y_end: 1 });
    }

    #[test]
    fn test_split_sizes_account_for_parent_area() {
        // Each axis loses exactly one span unit to the quadrant seams, so the
        // four child sizes always total (span_x - 1) * (span_y - 1) no matter
        // how odd spans round at the midpoint.
        let map = ImageMap::from_fn(16, 16, |_, _| 0).unwrap();
        for (x_end, y_end) in [(15, 15), (14, 10), (7, 12)] {
            let parent = Region::new(&map, 0, x_end, 0, y_end).unwrap();
            let total: u64 = parent.split().iter().map(Region::size).sum();
            assert_eq!(total, u64::from(x_end - 1) * u64::from(y_end - 1));
            assert!(total <= parent.size());
        }
    }

    #[test]
    fn test_mean_intensity() {
        let map = ImageMap::from_raw(2, 2, vec![10, 20, 30, 40]).unwrap();
        let root = Region::full(&map);
        assert_relative_eq!(root.mean(&map), 25.0);

        let top_row = Region::new(&map, 0, 1, 0, 0).unwrap();
        assert_relative_eq!(top_row.mean(&map), 15.0);
    }
}
