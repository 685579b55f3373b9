//! Filtering call boundary
//!
//! Ties the catalogue, the convolution engine and the scaling engine into the
//! single entry point consumers call: look the kernel up by name, filter with
//! the configured border policy and pass count, scale once at the end.

use image::RgbaImage;

use crate::filter::convolve::{apply_kernel, apply_kernel_gray, FilterError, FilterOptions};
use crate::filter::scale::{scale, ScalingMethod};
use crate::kernel::kernel_by_name;

/// Immutable configuration for one filtering call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterConfig {
    /// Convolution options: border policy, border color, pass count
    pub options: FilterOptions,
    /// Output mapping, applied once after all passes
    pub scaling: ScalingMethod,
}

/// Filter an image by catalogue kernel name and scale the result.
///
/// The degenerate 1x1 pass-through combined with `Clip` scaling filters all
/// four channels directly; every other combination reduces the image to its
/// luminance plane first, so edge and smoothing masks work on gray values.
/// The output buffer always has the input's dimensions.
///
/// # Arguments
/// * `image` - Input color buffer (never mutated)
/// * `kernel_name` - Catalogue key, e.g. `"laplace_4"`
/// * `config` - Filtering and scaling configuration
///
/// # Returns
/// * The filtered, scaled buffer, or a [`FilterError`] describing the first
///   invalid parameter
///
/// # Examples
///
/// ```rust
/// use image::{Rgba, RgbaImage};
/// use quadmask::filter::{filter_and_scale, FilterConfig};
///
/// let image = RgbaImage::from_pixel(8, 8, Rgba([90, 90, 90, 255]));
/// let result = filter_and_scale(&image, "smooth_gauss", &FilterConfig::default()).unwrap();
/// assert_eq!(result.dimensions(), (8, 8));
/// ```
pub fn filter_and_scale(
    image: &RgbaImage,
    kernel_name: &str,
    config: &FilterConfig,
) -> Result<RgbaImage, FilterError> {
    let kernel = kernel_by_name(kernel_name)
        .ok_or_else(|| FilterError::UnknownKernel(kernel_name.to_string()))?;

    let planes = if kernel.is_identity() && config.scaling == ScalingMethod::Clip {
        apply_kernel(image, kernel, &config.options)?
    } else {
        apply_kernel_gray(image, kernel, &config.options)?
    };

    Ok(scale(&planes, config.scaling))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::convolve::BorderPolicy;
    use crate::kernel::ALL_KERNELS;
    use image::Rgba;

    #[test]
    fn test_unknown_kernel_name() {
        let image = RgbaImage::new(2, 2);
        let result = filter_and_scale(&image, "gaussian_blur", &FilterConfig::default());
        assert!(matches!(result, Err(FilterError::UnknownKernel(name)) if name == "gaussian_blur"));
    }

    #[test]
    fn test_identity_clip_keeps_all_channels() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 200, 30, 255]));
        let result = filter_and_scale(&image, "identity", &FilterConfig::default()).unwrap();
        assert_eq!(result, image);
    }

    #[test]
    fn test_non_clip_identity_goes_gray() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 0, 255]));

        let config = FilterConfig {
            scaling: ScalingMethod::LinearStretch,
            ..Default::default()
        };
        let result = filter_and_scale(&image, "identity", &config).unwrap();
        // Luminance [76, 0] stretches to [255, 0], replicated into RGB
        assert_eq!(result.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(result.get_pixel(1, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_sobel_on_step_edge() {
        // Columns 0-1 black, 2-3 white: the horizontal gradient peaks on the
        // two columns straddling the step and vanishes on the flat sides.
        let image = RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let config = FilterConfig {
            scaling: ScalingMethod::ThreeLevel,
            ..Default::default()
        };
        let result = filter_and_scale(&image, "sobel_x", &config).unwrap();
        let levels: Vec<u8> = (0..4).map(|x| result.get_pixel(x, 0).0[0]).collect();
        assert_eq!(levels, vec![128, 255, 255, 128]);
    }

    #[test]
    fn test_validation_propagates() {
        let empty = RgbaImage::new(0, 0);
        assert!(matches!(
            filter_and_scale(&empty, "smooth_box", &FilterConfig::default()),
            Err(FilterError::EmptyImage(0, 0))
        ));
    }

    #[test]
    fn test_output_dimensions_match_input() {
        let image = RgbaImage::from_pixel(7, 5, Rgba([50, 60, 70, 255]));
        for name in ["identity", "smooth_box", "laplace_8"] {
            let result = filter_and_scale(&image, name, &FilterConfig::default()).unwrap();
            assert_eq!(result.dimensions(), (7, 5), "{name} changed dimensions");
        }
    }

    #[test]
    fn test_zero_sum_kernels_vanish_on_constant_color() {
        // A constant buffer has no gradients: every derivative mask must
        // respond with exact zero once the replicated border removes edge
        // effects, and clipping maps that to black.
        let image = RgbaImage::from_pixel(6, 5, Rgba([90, 140, 200, 255]));
        let config = FilterConfig {
            options: FilterOptions {
                border: BorderPolicy::Replicate,
                ..Default::default()
            },
            scaling: ScalingMethod::Clip,
        };
        for kernel in ALL_KERNELS.iter().filter(|kernel| kernel.sum() == 0) {
            let result = filter_and_scale(&image, kernel.name(), &config).unwrap();
            assert!(
                result.pixels().all(|pixel| pixel.0 == [0, 0, 0, 255]),
                "{} left a nonzero response on a constant buffer",
                kernel.name()
            );
        }
    }

    #[test]
    fn test_sum_one_kernel_preserves_constant_image() {
        // Sharpening a flat mid-gray field changes nothing: the weighted sum
        // collapses to the center sample, so the clipped output repeats the
        // input level in every color channel.
        let image = RgbaImage::from_pixel(4, 4, Rgba([100, 100, 100, 255]));
        let config = FilterConfig {
            options: FilterOptions {
                border: BorderPolicy::Replicate,
                ..Default::default()
            },
            scaling: ScalingMethod::Clip,
        };
        let result = filter_and_scale(&image, "sharpen", &config).unwrap();
        assert!(result
            .pixels()
            .all(|pixel| pixel.0 == [100, 100, 100, 255]));
    }
}
