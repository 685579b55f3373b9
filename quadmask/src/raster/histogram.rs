//! Intensity histograms
//!
//! 256-bin counters over 8-bit sample levels, one per channel. Used by the
//! CLI to summarize a filtered result; counts are `u64` so arbitrarily large
//! rasters never wrap.

use image::RgbaImage;
use ndarray::ArrayView2;

/// A 256-bin histogram of 8-bit intensity levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: [u64; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self { bins: [0; 256] }
    }
}

impl Histogram {
    /// An empty histogram with every bin at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every sample of a grayscale plane.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ndarray::arr2;
    /// use quadmask::raster::Histogram;
    ///
    /// let hist = Histogram::from_plane(arr2(&[[0u8, 0], [255, 0]]).view());
    /// assert_eq!(hist.count(0), 3);
    /// assert_eq!(hist.count(255), 1);
    /// ```
    pub fn from_plane(plane: ArrayView2<u8>) -> Self {
        let mut hist = Self::new();
        for &level in plane.iter() {
            hist.record(level);
        }
        hist
    }

    /// Add one sample at `level`.
    pub fn record(&mut self, level: u8) {
        self.bins[level as usize] += 1;
    }

    /// Count in a single bin.
    pub fn count(&self, level: u8) -> u64 {
        self.bins[level as usize]
    }

    /// All 256 bins in level order.
    pub fn bins(&self) -> &[u64; 256] {
        &self.bins
    }

    /// Total number of recorded samples.
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Lowest level with a nonzero count, `None` when empty.
    pub fn min_level(&self) -> Option<u8> {
        self.bins
            .iter()
            .position(|&count| count > 0)
            .map(|level| level as u8)
    }

    /// Highest level with a nonzero count, `None` when empty.
    pub fn max_level(&self) -> Option<u8> {
        self.bins
            .iter()
            .rposition(|&count| count > 0)
            .map(|level| level as u8)
    }

    /// Mean recorded level, `None` when empty.
    pub fn mean_level(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted: u64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(level, &count)| level as u64 * count)
            .sum();
        Some(weighted as f64 / total as f64)
    }
}

/// Per-channel histograms of a color image, in R, G, B, A order.
#[derive(Debug, Clone, Default)]
pub struct RgbaHistogram {
    channels: [Histogram; 4],
}

impl RgbaHistogram {
    /// Count every pixel of `image` into four channel histograms.
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let mut channels: [Histogram; 4] = Default::default();
        for pixel in image.pixels() {
            for (histogram, &level) in channels.iter_mut().zip(pixel.0.iter()) {
                histogram.record(level);
            }
        }
        Self { channels }
    }

    /// Histogram for one channel (0=R, 1=G, 2=B, 3=A).
    pub fn channel(&self, index: usize) -> &Histogram {
        &self.channels[index]
    }
}
