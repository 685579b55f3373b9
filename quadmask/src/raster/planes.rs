//! Signed working raster
//!
//! Convolution outputs live here between passes: raw weighted sums that may
//! be negative or exceed 255, one `Array2<i64>` per channel. Nothing clamps
//! or rescales these values until the scaling engine runs once at the end of
//! the pipeline.

use image::{GrayImage, RgbaImage};
use ndarray::Array2;

use crate::raster::image_map::luminance;

/// Channel layout of a working raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneKind {
    /// Single luminance plane
    Gray,
    /// Four planes in R, G, B, A order
    Rgba,
}

impl PlaneKind {
    /// Number of planes this layout carries.
    pub fn plane_count(&self) -> usize {
        match self {
            PlaneKind::Gray => 1,
            PlaneKind::Rgba => 4,
        }
    }
}

/// One or more signed sample planes of identical dimensions.
///
/// Values are unconstrained `i64` so that zero-sum kernels can produce
/// negative edge responses and repeated passes can compound without loss;
/// even high-gain smoothing masks take more than a dozen passes to approach
/// the representable range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPlanes {
    planes: Vec<Array2<i64>>,
    kind: PlaneKind,
}

impl RawPlanes {
    /// Assemble a raster from pre-built planes.
    ///
    /// Callers guarantee the plane count matches `kind` and all planes share
    /// one shape; both are checked in debug builds.
    pub(crate) fn from_parts(planes: Vec<Array2<i64>>, kind: PlaneKind) -> Self {
        debug_assert_eq!(planes.len(), kind.plane_count());
        debug_assert!(planes.windows(2).all(|pair| pair[0].dim() == pair[1].dim()));
        Self { planes, kind }
    }

    /// Split a color image into four signed channel planes.
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let planes = (0..4)
            .map(|channel| {
                Array2::from_shape_fn((height, width), |(y, x)| {
                    i64::from(image.get_pixel(x as u32, y as u32).0[channel])
                })
            })
            .collect();
        Self {
            planes,
            kind: PlaneKind::Rgba,
        }
    }

    /// Reduce a color image to a single signed luminance plane.
    pub fn from_luma(image: &RgbaImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let plane = Array2::from_shape_fn((height, width), |(y, x)| {
            i64::from(luminance(*image.get_pixel(x as u32, y as u32)))
        });
        Self {
            planes: vec![plane],
            kind: PlaneKind::Gray,
        }
    }

    /// Lift a grayscale image into a single signed plane.
    pub fn from_gray_image(image: &GrayImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let plane = Array2::from_shape_fn((height, width), |(y, x)| {
            i64::from(image.get_pixel(x as u32, y as u32).0[0])
        });
        Self {
            planes: vec![plane],
            kind: PlaneKind::Gray,
        }
    }

    /// Raster width in samples.
    pub fn width(&self) -> u32 {
        self.planes[0].ncols() as u32
    }

    /// Raster height in samples.
    pub fn height(&self) -> u32 {
        self.planes[0].nrows() as u32
    }

    /// Channel layout tag.
    pub fn kind(&self) -> PlaneKind {
        self.kind
    }

    /// The sample planes, one per channel in layout order.
    pub fn planes(&self) -> &[Array2<i64>] {
        &self.planes
    }

    /// Consume the raster, yielding the owned planes for a filtering pass.
    pub(crate) fn into_planes(self) -> Vec<Array2<i64>> {
        self.planes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn two_pixel_image() -> RgbaImage {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        image.put_pixel(1, 0, Rgba([200, 100, 50, 128]));
        image
    }

    #[test]
    fn test_from_rgba_splits_channels() {
        let planes = RawPlanes::from_rgba(&two_pixel_image());
        assert_eq!(planes.kind(), PlaneKind::Rgba);
        assert_eq!(planes.planes().len(), 4);
        assert_eq!(planes.width(), 2);
        assert_eq!(planes.height(), 1);

        assert_eq!(planes.planes()[0][[0, 1]], 200);
        assert_eq!(planes.planes()[1][[0, 0]], 20);
        assert_eq!(planes.planes()[2][[0, 1]], 50);
        assert_eq!(planes.planes()[3][[0, 1]], 128);
    }

    #[test]
    fn test_from_luma_single_plane() {
        let planes = RawPlanes::from_luma(&two_pixel_image());
        assert_eq!(planes.kind(), PlaneKind::Gray);
        assert_eq!(planes.planes().len(), 1);
        // 0.299*10 + 0.587*20 + 0.114*30 = 18.15 -> 18
        assert_eq!(planes.planes()[0][[0, 0]], 18);
    }

    #[test]
    fn test_from_gray_image() {
        let mut gray = GrayImage::new(1, 2);
        gray.put_pixel(0, 0, image::Luma([7]));
        gray.put_pixel(0, 1, image::Luma([250]));
        let planes = RawPlanes::from_gray_image(&gray);
        assert_eq!(planes.kind(), PlaneKind::Gray);
        assert_eq!(planes.planes()[0][[1, 0]], 250);
    }

    #[test]
    fn test_plane_count() {
        assert_eq!(PlaneKind::Gray.plane_count(), 1);
        assert_eq!(PlaneKind::Rgba.plane_count(), 4);
    }
}
