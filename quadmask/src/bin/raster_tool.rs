//! Raster filtering and segmentation tool
//!
//! Applies catalogue kernels to images and decomposes them into homogeneous
//! blocks from the command line. Images are decoded into RGBA buffers on the
//! way in and re-encoded from the filtered result on the way out; the library
//! itself never touches files.
//!
//! # Usage
//!
//! ```bash
//! # Build the tool
//! cargo build --release --bin raster_tool
//!
//! # List the kernel catalogue
//! cargo run --release --bin raster_tool -- kernels
//!
//! # Laplacian edge detection with three-level output
//! cargo run --release --bin raster_tool -- filter photo.png edges.png -k laplace_8 -s three-level
//!
//! # Compound smoothing with a replicated border, stretched back to full range
//! cargo run --release --bin raster_tool -- filter photo.png soft.png -k smooth_gauss -t 3 -b replicate -s stretch
//!
//! # Sobel gradient against a fixed white border
//! cargo run --release --bin raster_tool -- filter photo.png grad.png -k sobel_x -b fixed --border-color white -s stretch
//!
//! # Quadtree decomposition, leaf listing and block mosaic rendering
//! cargo run --release --bin raster_tool -- segment photo.png -t 16 --list -o blocks.png
//! ```
//!
//! # Commands
//!
//! ## `kernels` - List the kernel catalogue
//! - Prints the name, size, weight sum and weights of every kernel
//!
//! ## `filter` - Apply a kernel to an image
//! - Filters, scales and saves the result, then prints per-channel level
//!   statistics of the output
//! - Options:
//!   - `-k, --kernel`: catalogue name, see `kernels`
//!   - `-b, --border`: fixed, replicate, or reflect (default: reflect)
//!   - `--border-color`: black, white, or R,G,B[,A] (required with `-b fixed`)
//!   - `-t, --times`: number of compounding passes (default: 1)
//!   - `-s, --scaling`: stretch, three-level, or clip (default: clip)
//!
//! ## `segment` - Decompose an image into homogeneous blocks
//! - Reduces the image to its luminance grid, builds the quadtree and prints
//!   node, leaf and depth counts plus the grid's intensity range
//! - Options:
//!   - `-t, --threshold`: largest homogeneous max - min spread (default: 10)
//!   - `--scan-mode`: region or origin (default: region)
//!   - `-l, --list`: print every leaf block with its mean intensity
//!   - `-o, --output`: render each leaf as a flat block of its mean intensity

use clap::{Parser, Subcommand};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

use quadmask::filter::{
    filter_and_scale, BorderPolicy, FilterConfig, FilterOptions, ScalingMethod,
};
use quadmask::kernel::ALL_KERNELS;
use quadmask::raster::{Histogram, ImageMap, RgbaHistogram};
use quadmask::segment::{build_quadtree, render_leaves, ScanMode, SegmentConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the kernel catalogue
    Kernels,

    /// Apply a catalogue kernel to an image
    Filter {
        /// Input image path
        input: PathBuf,

        /// Output image path
        output: PathBuf,

        /// Kernel name: see the kernels command
        #[arg(short, long)]
        kernel: String,

        /// Border policy: fixed, replicate, or reflect
        #[arg(short, long, default_value = "reflect")]
        border: String,

        /// Border color for the fixed policy: black, white, or R,G,B[,A]
        #[arg(long)]
        border_color: Option<String>,

        /// Number of compounding passes
        #[arg(short, long, default_value_t = 1)]
        times: u32,

        /// Scaling method: stretch, three-level, or clip
        #[arg(short, long, default_value = "clip")]
        scaling: String,
    },

    /// Decompose an image into homogeneous blocks
    Segment {
        /// Input image path
        input: PathBuf,

        /// Largest max - min intensity spread a homogeneous block may have
        #[arg(short, long, default_value_t = 10)]
        threshold: u8,

        /// Homogeneity scan window: region (the block's own samples) or
        /// origin (everything from the grid origin to the block's far corner)
        #[arg(long, default_value = "region")]
        scan_mode: String,

        /// Print every leaf block with its mean intensity
        #[arg(short, long)]
        list: bool,

        /// Render each leaf as a flat block of its mean intensity
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Resolve a border policy name from the command line.
fn parse_border(name: &str) -> Result<BorderPolicy, String> {
    match name {
        "fixed" => Ok(BorderPolicy::FixedValue),
        "replicate" => Ok(BorderPolicy::Replicate),
        "reflect" => Ok(BorderPolicy::Reflect101),
        _ => Err(format!(
            "Unknown border policy '{name}' (expected fixed, replicate or reflect)"
        )),
    }
}

/// Resolve a scaling method name from the command line.
fn parse_scaling(name: &str) -> Result<ScalingMethod, String> {
    match name {
        "stretch" => Ok(ScalingMethod::LinearStretch),
        "three-level" => Ok(ScalingMethod::ThreeLevel),
        "clip" => Ok(ScalingMethod::Clip),
        _ => Err(format!(
            "Unknown scaling method '{name}' (expected stretch, three-level or clip)"
        )),
    }
}

/// Resolve a scan mode name from the command line.
fn parse_scan_mode(name: &str) -> Result<ScanMode, String> {
    match name {
        "region" => Ok(ScanMode::RegionOnly),
        "origin" => Ok(ScanMode::FromOrigin),
        _ => Err(format!(
            "Unknown scan mode '{name}' (expected region or origin)"
        )),
    }
}

/// Parse a border color: a named color or 3-4 comma-separated channel levels.
///
/// Alpha defaults to 255 when only R,G,B are given.
fn parse_border_color(value: &str) -> Result<Rgba<u8>, String> {
    match value {
        "black" => return Ok(Rgba([0, 0, 0, 255])),
        "white" => return Ok(Rgba([255, 255, 255, 255])),
        _ => {}
    }

    let channels: Vec<u8> = value
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("Bad border color '{value}' (expected black, white, or R,G,B[,A])"))?;

    match channels.as_slice() {
        [r, g, b] => Ok(Rgba([*r, *g, *b, 255])),
        [r, g, b, a] => Ok(Rgba([*r, *g, *b, *a])),
        _ => Err(format!(
            "Border color needs 3 or 4 channels, got {}",
            channels.len()
        )),
    }
}

/// Print per-channel level statistics of a filtered result.
fn print_level_summary(image: &RgbaImage) {
    let histograms = RgbaHistogram::from_rgba(image);

    println!();
    println!("{:<8} {:>5} {:>5} {:>8}", "Channel", "Min", "Max", "Mean");
    println!("{:-<29}", "");
    for (index, name) in ["R", "G", "B", "A"].iter().enumerate() {
        let channel = histograms.channel(index);
        // Filter output dimensions equal the input's, which decoding
        // guarantees nonempty, so the summaries are always present.
        let min = channel.min_level().unwrap_or(0);
        let max = channel.max_level().unwrap_or(0);
        let mean = channel.mean_level().unwrap_or(0.0);
        println!("{:<8} {:>5} {:>5} {:>8.2}", name, min, max, mean);
    }
}

fn run_kernels() {
    println!("{:<14} {:>4} {:>4}  Weights", "Name", "Size", "Sum");
    println!("{:-<50}", "");
    for kernel in ALL_KERNELS {
        let weights: Vec<String> = kernel
            .weights()
            .iter()
            .map(|weight| weight.to_string())
            .collect();
        println!(
            "{:<14} {:>4} {:>4}  {}",
            kernel.name(),
            kernel.size(),
            kernel.sum(),
            weights.join(" ")
        );
    }
}

fn run_filter(
    input: &Path,
    output: &Path,
    kernel: &str,
    border: &str,
    border_color: Option<&str>,
    times: u32,
    scaling: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = FilterConfig {
        options: FilterOptions {
            border: parse_border(border)?,
            border_value: border_color.map(parse_border_color).transpose()?,
            times,
        },
        scaling: parse_scaling(scaling)?,
    };

    let image = image::open(input)?.to_rgba8();
    let result = filter_and_scale(&image, kernel, &config)?;
    result.save(output)?;

    println!(
        "Filtered {} with {} ({} pass(es), {} border, {} scaling)",
        input.display(),
        kernel,
        times,
        border,
        scaling
    );
    println!("Wrote {}", output.display());
    print_level_summary(&result);
    Ok(())
}

fn run_segment(
    input: &Path,
    threshold: u8,
    scan_mode: &str,
    list: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = SegmentConfig {
        threshold,
        scan_mode: parse_scan_mode(scan_mode)?,
    };

    let image = image::open(input)?.to_rgba8();
    let map = ImageMap::from_rgba(&image)?;
    let tree = build_quadtree(&map, &config);
    let leaves = tree.leaves();

    println!(
        "Segmented {}x{} grid at threshold {}: {} nodes, {} leaves, depth {}",
        map.width(),
        map.height(),
        threshold,
        tree.len(),
        leaves.len(),
        tree.depth()
    );

    let levels = Histogram::from_plane(map.as_array().view());
    // The grid is never empty, so the summaries are always present.
    println!(
        "Intensity levels {}..{}, mean {:.2}",
        levels.min_level().unwrap_or(0),
        levels.max_level().unwrap_or(0),
        levels.mean_level().unwrap_or(0.0)
    );

    if list {
        println!();
        println!("{:<22} {:>8} {:>8}", "Leaf", "Pixels", "Mean");
        println!("{:-<40}", "");
        for region in &leaves {
            let corner = format!(
                "({},{})..({},{})",
                region.x_start, region.y_start, region.x_end, region.y_end
            );
            let pixels = u64::from(region.width()) * u64::from(region.height());
            println!("{:<22} {:>8} {:>8.2}", corner, pixels, region.mean(&map));
        }
    }

    if let Some(path) = output {
        render_leaves(&map, &tree).save(path)?;
        println!("Wrote block rendering to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Kernels => run_kernels(),

        Commands::Filter {
            input,
            output,
            kernel,
            border,
            border_color,
            times,
            scaling,
        } => run_filter(
            &input,
            &output,
            &kernel,
            &border,
            border_color.as_deref(),
            times,
            &scaling,
        )?,

        Commands::Segment {
            input,
            threshold,
            scan_mode,
            list,
            output,
        } => run_segment(&input, threshold, &scan_mode, list, output.as_deref())?,
    }

    Ok(())
}
