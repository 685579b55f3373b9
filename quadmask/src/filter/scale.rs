//! Post-filter value normalization
//!
//! Raw convolution sums are signed and unbounded; this module maps them back
//! onto displayable 8-bit levels. Three methods: a global linear stretch, a
//! three-level sign classification, and plain clipping. Scaling runs exactly
//! once per filtering call, after all compounding passes.

use image::{Rgba, RgbaImage};
use log::warn;
use ndarray::{Array2, ArrayView2};

use crate::raster::planes::{PlaneKind, RawPlanes};

/// Mid-range output level used when a stretch meets a flat image.
const FLAT_LEVEL: u8 = 128;

/// How raw signed samples map to 8-bit output levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingMethod {
    /// Map the global `[min, max]` sample range linearly onto `[0, 255]`
    LinearStretch,
    /// Classify by sign: negative to 0, zero to 128, positive to 255
    ThreeLevel,
    /// Clamp each sample into `[0, 255]`
    Clip,
}

impl Default for ScalingMethod {
    fn default() -> Self {
        ScalingMethod::Clip
    }
}

/// Global sample range over a set of planes.
fn sample_range(planes: &[Array2<i64>]) -> (i64, i64) {
    let samples = || planes.iter().flat_map(|plane| plane.iter().copied());
    let min = samples().min().unwrap_or(0);
    let max = samples().max().unwrap_or(0);
    (min, max)
}

fn stretch(plane: ArrayView2<i64>, min: i64, max: i64) -> Array2<u8> {
    if min == max {
        return Array2::from_elem(plane.dim(), FLAT_LEVEL);
    }
    // Spans wider than i64 are possible, so the subtraction happens in f64
    let span = max as f64 - min as f64;
    plane.map(|&sample| ((sample as f64 - min as f64) * 255.0 / span).round() as u8)
}

fn three_level(plane: ArrayView2<i64>) -> Array2<u8> {
    plane.map(|&sample| match sample {
        s if s < 0 => 0,
        0 => FLAT_LEVEL,
        _ => 255,
    })
}

fn clip(plane: ArrayView2<i64>) -> Array2<u8> {
    plane.map(|&sample| sample.clamp(0, 255) as u8)
}

/// Scale one plane in isolation.
///
/// For `LinearStretch` the range is this plane's own min and max; a flat
/// plane maps to the mid level 128 with a warning.
///
/// # Examples
///
/// ```rust
/// use ndarray::arr2;
/// use quadmask::filter::{scale_plane, ScalingMethod};
///
/// let plane = arr2(&[[-5, 0, 300]]);
/// let scaled = scale_plane(plane.view(), ScalingMethod::Clip);
/// assert_eq!(scaled, arr2(&[[0u8, 0, 255]]));
/// ```
pub fn scale_plane(plane: ArrayView2<i64>, method: ScalingMethod) -> Array2<u8> {
    match method {
        ScalingMethod::LinearStretch => {
            let min = plane.iter().copied().min().unwrap_or(0);
            let max = plane.iter().copied().max().unwrap_or(0);
            if min == max {
                warn!("Flat plane, stretching every sample to {}", FLAT_LEVEL);
            }
            stretch(plane, min, max)
        }
        ScalingMethod::ThreeLevel => three_level(plane),
        ScalingMethod::Clip => clip(plane),
    }
}

/// Scale a working raster into a displayable color buffer.
///
/// `LinearStretch` uses one global range across every plane so that channels
/// stay comparable. Gray rasters replicate the scaled plane into R, G and B
/// with full alpha; RGBA rasters map channel for channel.
///
/// # Arguments
/// * `planes` - Raw signed planes from the convolution engine
/// * `method` - Output mapping
///
/// # Returns
/// * An RGBA buffer with the raster's dimensions
pub fn scale(planes: &RawPlanes, method: ScalingMethod) -> RgbaImage {
    let scaled: Vec<Array2<u8>> = match method {
        ScalingMethod::LinearStretch => {
            let (min, max) = sample_range(planes.planes());
            if min == max {
                warn!(
                    "Flat image (all samples {}), stretching to {}",
                    min, FLAT_LEVEL
                );
            }
            planes
                .planes()
                .iter()
                .map(|plane| stretch(plane.view(), min, max))
                .collect()
        }
        ScalingMethod::ThreeLevel => planes
            .planes()
            .iter()
            .map(|plane| three_level(plane.view()))
            .collect(),
        ScalingMethod::Clip => planes
            .planes()
            .iter()
            .map(|plane| clip(plane.view()))
            .collect(),
    };

    let mut image = RgbaImage::new(planes.width(), planes.height());
    match planes.kind() {
        PlaneKind::Gray => {
            for (x, y, pixel) in image.enumerate_pixels_mut() {
                let level = scaled[0][[y as usize, x as usize]];
                *pixel = Rgba([level, level, level, 255]);
            }
        }
        PlaneKind::Rgba => {
            for (x, y, pixel) in image.enumerate_pixels_mut() {
                let idx = [y as usize, x as usize];
                *pixel = Rgba([scaled[0][idx], scaled[1][idx], scaled[2][idx], scaled[3][idx]]);
            }
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_clip_bounds() {
        let plane = arr2(&[[-1000, -1, 0, 100, 255, 1000]]);
        assert_eq!(
            scale_plane(plane.view(), ScalingMethod::Clip),
            arr2(&[[0u8, 0, 0, 100, 255, 255]])
        );
    }

    #[test]
    fn test_methods_handle_samples_past_32_bits() {
        // Compounded passes can push raw sums far beyond the 32-bit range;
        // every method still maps them onto 8-bit levels.
        let plane = arr2(&[[-5_000_000_000, 0, 4_278_190_080]]);
        assert_eq!(
            scale_plane(plane.view(), ScalingMethod::Clip),
            arr2(&[[0u8, 0, 255]])
        );
        assert_eq!(
            scale_plane(plane.view(), ScalingMethod::ThreeLevel),
            arr2(&[[0u8, 128, 255]])
        );
        let stretched = scale_plane(plane.view(), ScalingMethod::LinearStretch);
        assert_eq!(stretched[[0, 0]], 0);
        assert_eq!(stretched[[0, 2]], 255);
    }

    #[test]
    fn test_clip_is_idempotent() {
        let planes = RawPlanes::from_parts(vec![arr2(&[[-50, 0], [100, 400]]); 4], PlaneKind::Rgba);
        let once = scale(&planes, ScalingMethod::Clip);
        let twice = scale(&RawPlanes::from_rgba(&once), ScalingMethod::Clip);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_three_level_signs() {
        let plane = arr2(&[[-1, 0, 1], [-1000, 0, 1000]]);
        assert_eq!(
            scale_plane(plane.view(), ScalingMethod::ThreeLevel),
            arr2(&[[0u8, 128, 255], [0, 128, 255]])
        );
    }

    #[test]
    fn test_three_level_reclassifies_on_reapply() {
        // After one pass every sample is 0, 128 or 255; reapplying turns the
        // previous zero class into 128 and everything else into 255. Sign
        // classification cannot be idempotent and this pins that fact.
        let planes = RawPlanes::from_parts(vec![arr2(&[[-9, 0, 9]]); 4], PlaneKind::Rgba);
        let once = scale(&planes, ScalingMethod::ThreeLevel);
        let twice = scale(&RawPlanes::from_rgba(&once), ScalingMethod::ThreeLevel);
        assert_eq!(twice.get_pixel(0, 0).0[0], 128);
        assert_eq!(twice.get_pixel(1, 0).0[0], 255);
        assert_eq!(twice.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn test_linear_stretch_endpoints_and_rounding() {
        let plane = arr2(&[[10, 20, 30]]);
        // (20 - 10) * 255 / 20 = 127.5, rounds away from zero to 128
        assert_eq!(
            scale_plane(plane.view(), ScalingMethod::LinearStretch),
            arr2(&[[0u8, 128, 255]])
        );
    }

    #[test]
    fn test_linear_stretch_flat_plane() {
        let plane = arr2(&[[42, 42], [42, 42]]);
        let scaled = scale_plane(plane.view(), ScalingMethod::LinearStretch);
        assert!(scaled.iter().all(|&level| level == 128));
    }

    #[test]
    fn test_stretch_range_is_global_across_planes() {
        let planes = RawPlanes::from_parts(
            vec![
                arr2(&[[0]]),
                arr2(&[[50]]),
                arr2(&[[100]]),
                arr2(&[[100]]),
            ],
            PlaneKind::Rgba,
        );
        let image = scale(&planes, ScalingMethod::LinearStretch);
        // Global range [0, 100]: per-plane stretching would send every
        // channel to 128, the shared range keeps them apart.
        assert_eq!(image.get_pixel(0, 0).0, [0, 128, 255, 255]);
    }

    #[test]
    fn test_gray_reassembly_replicates_channels() {
        let planes = RawPlanes::from_parts(vec![arr2(&[[0, 300]])], PlaneKind::Gray);
        let image = scale(&planes, ScalingMethod::Clip);
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_default_method_is_clip() {
        assert_eq!(ScalingMethod::default(), ScalingMethod::Clip);
    }
}
