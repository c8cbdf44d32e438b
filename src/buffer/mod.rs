//! Buffer module: pixel storage for images, pieces and draw targets.
//!
//! This module contains:
//! - [`Rgb`]: True-color pixel representation
//! - [`PixelBuffer`]: A row-major grid of pixels with crop, downsample and
//!   scaled-blit operations

mod color;
#[allow(clippy::module_inception)]
mod buffer;

pub use buffer::PixelBuffer;
pub use color::Rgb;
