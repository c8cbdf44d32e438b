//! Image-load service: decode a source and downsample it to a bounded footprint.
//!
//! The downsample ratio is an integer. When the source is larger than the
//! requested box on either axis, the ratio is the smaller of the rounded
//! height and width ratios, so the constraining axis never ends up smaller
//! than requested.

use crate::buffer::{PixelBuffer, Rgb};
use crate::error::Result;
use std::path::PathBuf;

/// Where puzzle pixels come from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An encoded image file on disk (PNG or JPEG).
    Path(PathBuf),
    /// An encoded image held in memory.
    Bytes(Vec<u8>),
    /// Already decoded pixels.
    Pixels(PixelBuffer),
}

impl From<PixelBuffer> for ImageSource {
    fn from(buffer: PixelBuffer) -> Self {
        Self::Pixels(buffer)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Compute the integer downsample ratio for a source of `width` x `height`
/// loaded into a `target_width` x `target_height` box.
///
/// Never returns less than 1.
pub fn sample_ratio(width: u32, height: u32, target_width: u32, target_height: u32) -> u32 {
    if target_width == 0 || target_height == 0 {
        return 1;
    }
    if height <= target_height && width <= target_width {
        return 1;
    }
    let height_ratio = (f64::from(height) / f64::from(target_height)).round() as u32;
    let width_ratio = (f64::from(width) / f64::from(target_width)).round() as u32;
    height_ratio.min(width_ratio).max(1)
}

/// Decode `source` and downsample it by [`sample_ratio`] for the target box.
pub fn load_and_scale(source: &ImageSource, target_width: u32, target_height: u32) -> Result<PixelBuffer> {
    let decoded = match source {
        ImageSource::Path(path) => decode(image::open(path)?)?,
        ImageSource::Bytes(bytes) => decode(image::load_from_memory(bytes)?)?,
        ImageSource::Pixels(buffer) => buffer.clone(),
    };

    let ratio = sample_ratio(decoded.width(), decoded.height(), target_width, target_height);
    log::debug!(
        "loaded {}x{} image, downsample ratio {ratio} for {target_width}x{target_height}",
        decoded.width(),
        decoded.height()
    );
    Ok(decoded.downsample(ratio))
}

fn decode(image: image::DynamicImage) -> Result<PixelBuffer> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels = rgb.pixels().map(|p| Rgb::from(*p)).collect();
    PixelBuffer::from_pixels(width, height, pixels)
}
