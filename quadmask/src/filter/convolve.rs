//! Spatial convolution with explicit border handling
//!
//! This module implements the filtering core: a single raw convolution pass
//! over one signed plane, and the multi-pass drivers that run it across the
//! channel planes of an image. Output samples are raw weighted sums; nothing
//! here clamps or rescales, that is the scaling engine's job.

use image::{Rgba, RgbaImage};
use log::debug;
use ndarray::{Array2, ArrayView2};
use thiserror::Error;

use crate::kernel::Kernel;
use crate::raster::image_map::luminance;
use crate::raster::planes::{PlaneKind, RawPlanes};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("No kernel named '{0}' in the catalogue")]
    UnknownKernel(String),

    #[error("Fixed-value border requires a border color")]
    MissingBorderValue,

    #[error("Image must have nonzero dimensions, got {0}x{1}")]
    EmptyImage(u32, u32),

    #[error("Repeat count must be at least 1")]
    ZeroRepeat,

    #[error("Compounding pass {pass} would overflow the sample range")]
    SampleOverflow { pass: u32 },
}

/// How neighborhood samples outside the image are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderPolicy {
    /// Outside samples take a caller-supplied constant color
    FixedValue,
    /// Outside samples take the nearest edge sample
    Replicate,
    /// Mirror across the edge without repeating the edge sample
    /// (`-1` maps to `1`, `width` maps to `width - 2`)
    Reflect101,
}

/// Options for one filtering call.
#[derive(Debug, Clone, Copy)]
pub struct FilterOptions {
    /// Border extension policy
    pub border: BorderPolicy,
    /// Constant border color, required by `BorderPolicy::FixedValue`
    pub border_value: Option<Rgba<u8>>,
    /// Number of compounding passes (>= 1); each pass re-filters the
    /// previous pass's raw output
    pub times: u32,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            border: BorderPolicy::Reflect101,
            border_value: None,
            times: 1,
        }
    }
}

/// Resolve one axis coordinate against the border policy.
///
/// `None` means the sample lies outside a fixed-value border and the caller
/// substitutes the fill constant. The reflecting policies always land on an
/// interior index for the radius-1 neighborhoods the catalogue produces;
/// single-sample axes fall back to the only index there is.
fn resolve_axis(coord: isize, len: usize, border: BorderPolicy) -> Option<usize> {
    if coord >= 0 && coord < len as isize {
        return Some(coord as usize);
    }
    match border {
        BorderPolicy::FixedValue => None,
        BorderPolicy::Replicate => Some(coord.clamp(0, len as isize - 1) as usize),
        BorderPolicy::Reflect101 => {
            if len == 1 {
                Some(0)
            } else if coord < 0 {
                Some((-coord) as usize)
            } else {
                Some((2 * (len as isize - 1) - coord) as usize)
            }
        }
    }
}

/// One raw convolution pass over one plane.
///
/// Every output sample is the weighted sum of its kernel neighborhood;
/// out-of-bounds neighbors are resolved by `border`, with `border_value`
/// standing in for fixed-value samples. The result keeps the input
/// dimensions and is never clamped. Accumulation is unchecked; the
/// multi-pass drivers bound the input magnitude before every pass so the
/// sums always fit.
///
/// # Arguments
/// * `plane` - Input samples, shape `(height, width)`
/// * `kernel` - Catalogue kernel to apply
/// * `border` - Border extension policy
/// * `border_value` - Fill constant for `BorderPolicy::FixedValue`
///
/// # Returns
/// * Raw signed sums, same shape as `plane`
pub fn filter_plane(
    plane: ArrayView2<i64>,
    kernel: &Kernel,
    border: BorderPolicy,
    border_value: i64,
) -> Array2<i64> {
    let (rows, cols) = plane.dim();
    let size = kernel.size() as usize;
    let radius = (size / 2) as isize;

    let mut output = Array2::zeros((rows, cols));
    for y in 0..rows {
        for x in 0..cols {
            let mut sum = 0;
            for ky in 0..size {
                for kx in 0..size {
                    let sample_y = y as isize + ky as isize - radius;
                    let sample_x = x as isize + kx as isize - radius;

                    let sample = match (
                        resolve_axis(sample_y, rows, border),
                        resolve_axis(sample_x, cols, border),
                    ) {
                        (Some(sy), Some(sx)) => plane[[sy, sx]],
                        _ => border_value,
                    };

                    sum += i64::from(kernel.weight(ky as u32, kx as u32)) * sample;
                }
            }
            output[[y, x]] = sum;
        }
    }
    output
}

fn validate(image: &RgbaImage, options: &FilterOptions) -> Result<(), FilterError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(FilterError::EmptyImage(image.width(), image.height()));
    }
    if options.times == 0 {
        return Err(FilterError::ZeroRepeat);
    }
    if options.border == BorderPolicy::FixedValue && options.border_value.is_none() {
        return Err(FilterError::MissingBorderValue);
    }
    Ok(())
}

fn run_passes(
    mut planes: Vec<Array2<i64>>,
    fills: &[i64],
    kernel: &Kernel,
    options: &FilterOptions,
) -> Result<Vec<Array2<i64>>, FilterError> {
    // Worst case per output sample is the abs-weight sum times the largest
    // input magnitude; a pass only runs while that product still fits.
    let gain: u64 = kernel
        .weights()
        .iter()
        .map(|weight| u64::from(weight.unsigned_abs()))
        .sum();

    for pass in 0..options.times {
        let peak = planes
            .iter()
            .flat_map(|plane| plane.iter())
            .map(|sample| sample.unsigned_abs())
            .chain(fills.iter().map(|fill| fill.unsigned_abs()))
            .max()
            .unwrap_or(0);
        if gain > 0 && peak > i64::MAX as u64 / gain {
            return Err(FilterError::SampleOverflow { pass: pass + 1 });
        }

        planes = planes
            .iter()
            .zip(fills)
            .map(|(plane, &fill)| filter_plane(plane.view(), kernel, options.border, fill))
            .collect();
        debug!("{} pass {}/{} complete", kernel.name(), pass + 1, options.times);
    }
    Ok(planes)
}

/// Filter all four channels of a color image independently.
///
/// Runs `options.times` compounding passes per channel; each pass re-filters
/// the previous pass's raw signed output. The fixed border constant for each
/// channel comes from the matching channel of `options.border_value`. A pass
/// whose sums could exceed the sample range fails with
/// [`FilterError::SampleOverflow`] instead of running.
///
/// # Arguments
/// * `image` - Input color buffer (never mutated)
/// * `kernel` - Catalogue kernel to apply
/// * `options` - Border policy, border color and pass count
///
/// # Returns
/// * Four raw signed planes in R, G, B, A order
pub fn apply_kernel(
    image: &RgbaImage,
    kernel: &Kernel,
    options: &FilterOptions,
) -> Result<RawPlanes, FilterError> {
    validate(image, options)?;

    let border = options.border_value.unwrap_or(Rgba([0, 0, 0, 0]));
    let fills: Vec<i64> = border.0.iter().map(|&channel| i64::from(channel)).collect();

    let planes = run_passes(RawPlanes::from_rgba(image).into_planes(), &fills, kernel, options)?;
    Ok(RawPlanes::from_parts(planes, PlaneKind::Rgba))
}

/// Filter the luminance reduction of a color image.
///
/// The image collapses to a single gray plane first; passes then compound on
/// that plane exactly as in [`apply_kernel`]. The fixed border constant is
/// the luminance of `options.border_value`.
pub fn apply_kernel_gray(
    image: &RgbaImage,
    kernel: &Kernel,
    options: &FilterOptions,
) -> Result<RawPlanes, FilterError> {
    validate(image, options)?;

    let fill = options
        .border_value
        .map(|color| i64::from(luminance(color)))
        .unwrap_or(0);

    let planes = run_passes(RawPlanes::from_luma(image).into_planes(), &[fill], kernel, options)?;
    Ok(RawPlanes::from_parts(planes, PlaneKind::Gray))
}
