//! Grayscale intensity grid
//!
//! `ImageMap` is the read-only single-channel raster the segmentation layer
//! scans. Every coordinate inside the grid holds exactly one 8-bit intensity
//! sample. Construction validates dimensions up front so that downstream
//! region arithmetic never meets an empty grid.

use image::{Rgba, RgbaImage};
use ndarray::Array2;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RasterError {
    #[error("Raster must have nonzero dimensions, got {0}x{1}")]
    EmptyGrid(u32, u32),

    #[error("Buffer holds {actual} samples but {width}x{height} requires {expected}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Rec. 601 luminance of an RGBA pixel, rounded to the nearest level.
///
/// This is the color-to-gray reduction used everywhere a multi-channel
/// buffer collapses to one plane: before edge filtering, when deriving a
/// segmentation grid, and for the gray border constant of a fixed-value
/// border.
///
/// # Examples
///
/// ```rust
/// use image::Rgba;
/// use quadmask::raster::luminance;
///
/// assert_eq!(luminance(Rgba([255, 255, 255, 255])), 255);
/// assert_eq!(luminance(Rgba([255, 0, 0, 255])), 76);
/// ```
pub fn luminance(pixel: Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)).round() as u8
}

/// A validated grayscale intensity grid.
///
/// Samples are stored row-major as an `Array2<u8>` with shape
/// `(height, width)`. The grid is immutable after construction; the
/// segmentation layer borrows it for lookup and never owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMap {
    data: Array2<u8>,
}

impl ImageMap {
    /// Wrap an existing intensity array.
    ///
    /// # Arguments
    /// * `data` - Samples with shape `(height, width)`
    ///
    /// # Returns
    /// * The wrapped grid, or `RasterError::EmptyGrid` if either dimension
    ///   is zero
    pub fn from_array(data: Array2<u8>) -> Result<Self, RasterError> {
        let (height, width) = data.dim();
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyGrid(width as u32, height as u32));
        }
        Ok(Self { data })
    }

    /// Build a grid from a row-major sample buffer.
    ///
    /// # Arguments
    /// * `width` - Grid width in samples
    /// * `height` - Grid height in samples
    /// * `samples` - Row-major intensity values, length `width * height`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quadmask::raster::ImageMap;
    ///
    /// let map = ImageMap::from_raw(2, 2, vec![0, 50, 100, 150]).unwrap();
    /// assert_eq!(map.gray(1, 1), 150);
    /// ```
    pub fn from_raw(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyGrid(width, height));
        }
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        let data = Array2::from_shape_vec((height as usize, width as usize), samples)
            .map_err(|_| RasterError::EmptyGrid(width, height))?;
        Ok(Self { data })
    }

    /// Derive a grid from a color image by luminance reduction.
    pub fn from_rgba(image: &RgbaImage) -> Result<Self, RasterError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(RasterError::EmptyGrid(image.width(), image.height()));
        }
        let data = Array2::from_shape_fn(
            (image.height() as usize, image.width() as usize),
            |(y, x)| luminance(*image.get_pixel(x as u32, y as u32)),
        );
        Ok(Self { data })
    }

    /// Build a grid by evaluating `f(x, y)` at every coordinate.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Result<Self, RasterError>
    where
        F: Fn(u32, u32) -> u8,
    {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyGrid(width, height));
        }
        let data = Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
            f(x as u32, y as u32)
        });
        Ok(Self { data })
    }

    /// Grid width in samples (always nonzero).
    pub fn width(&self) -> u32 {
        self.data.ncols() as u32
    }

    /// Grid height in samples (always nonzero).
    pub fn height(&self) -> u32 {
        self.data.nrows() as u32
    }

    /// Intensity at `(x, y)`.
    ///
    /// Panics if the coordinate lies outside the grid; callers scan inside
    /// validated region bounds.
    pub fn gray(&self, x: u32, y: u32) -> u8 {
        self.data[[y as usize, x as usize]]
    }

    /// Checked intensity lookup.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.data.get([y as usize, x as usize]).copied()
    }

    /// The underlying sample array, shape `(height, width)`.
    pub fn as_array(&self) -> &Array2<u8> {
        &self.data
    }
}
