//! PixelBuffer: A grid of pixels for images, pieces and draw targets.
//!
//! The buffer uses contiguous memory allocation for cache efficiency.
//! Pixels are stored in row-major order.

use super::color::Rgb;
use crate::error::{PuzzleError, Result};
use crate::layout::Rect;

/// A grid of RGB pixels.
///
/// Access is in row-major order: `index = y * width + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Contiguous pixel storage (row-major order).
    pixels: Vec<Rgb>,
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
}

impl PixelBuffer {
    /// Create a new buffer filled with black.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "PixelBuffer dimensions must be non-zero");
        Self::filled(width, height, Rgb::BLACK)
    }

    /// Create a buffer filled with one color. Zero sizes give an empty buffer.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            pixels: vec![color; size],
            width,
            height,
        }
    }

    /// Wrap existing pixel data.
    ///
    /// Fails with [`PuzzleError::InvalidDimensions`] if either dimension is
    /// zero or the pixel count does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) {
            return Err(PuzzleError::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Check if the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Get a reference to the underlying pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get the pixel at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Fill the whole buffer with one color.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Fill a rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let clip = rect.intersection(&self.bounds());
        if clip.is_empty() {
            return;
        }
        let width = self.width as usize;
        for y in clip.y..clip.bottom() {
            let start = (y as usize) * width + clip.x as usize;
            self.pixels[start..start + clip.width as usize].fill(color);
        }
    }

    /// Draw a one-pixel outline along the inside of `rect`, clipped.
    pub fn stroke_rect(&mut self, rect: Rect, color: Rgb) {
        if rect.is_empty() {
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - 1, rect.width, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.height), color);
        self.fill_rect(Rect::new(rect.right() - 1, rect.y, 1, rect.height), color);
    }

    /// Copy out the sub-image at `(x, y)` of size `width` x `height`.
    ///
    /// Returns `None` unless the region lies entirely inside the buffer.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Option<Self> {
        if width == 0
            || height == 0
            || x.checked_add(width)? > self.width
            || y.checked_add(height)? > self.height
        {
            return None;
        }
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for row in y..y + height {
            let start = (row as usize) * (self.width as usize) + x as usize;
            pixels.extend_from_slice(&self.pixels[start..start + width as usize]);
        }
        Some(Self {
            pixels,
            width,
            height,
        })
    }

    /// Keep every `ratio`-th pixel on both axes.
    ///
    /// A ratio of 0 or 1 returns an unchanged copy.
    #[must_use]
    pub fn downsample(&self, ratio: u32) -> Self {
        if ratio <= 1 {
            return self.clone();
        }
        let width = self.width.div_ceil(ratio);
        let height = self.height.div_ceil(ratio);
        Self::from_fn(width, height, |x, y| {
            self.pixels[((y * ratio) as usize) * (self.width as usize) + (x * ratio) as usize]
        })
    }

    /// Draw `src` scaled (nearest neighbour) into `dest`, clipped to this buffer.
    pub fn blit_scaled(&mut self, src: &Self, dest: Rect) {
        if src.is_empty() || dest.is_empty() {
            return;
        }
        let clip = dest.intersection(&self.bounds());
        if clip.is_empty() {
            return;
        }
        let width = self.width as usize;
        for y in clip.y..clip.bottom() {
            let sy = (i64::from(y - dest.y) * i64::from(src.height) / i64::from(dest.height)) as usize;
            let row = sy * src.width as usize;
            let out = (y as usize) * width;
            for x in clip.x..clip.right() {
                let sx = (i64::from(x - dest.x) * i64::from(src.width) / i64::from(dest.width)) as usize;
                self.pixels[out + x as usize] = src.pixels[row + sx];
            }
        }
    }

    /// Resize the buffer, discarding content. New pixels are black.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == self.width && new_height == self.height {
            return;
        }
        self.pixels = vec![Rgb::BLACK; (new_width as usize) * (new_height as usize)];
        self.width = new_width;
        self.height = new_height;
    }

    /// The whole buffer as a rectangle at the origin.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width as i32, self.height as i32)
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| Rgb::new(x as u8, y as u8, 0))
    }

    #[test]
    fn test_buffer_new() {
        let buffer = PixelBuffer::new(80, 24);
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.len(), 80 * 24);
    }

    #[test]
    #[should_panic]
    fn test_buffer_zero_width() {
        PixelBuffer::new(0, 24);
    }

    #[test]
    fn test_buffer_from_pixels_validates() {
        assert!(PixelBuffer::from_pixels(2, 2, vec![Rgb::WHITE; 4]).is_ok());
        assert!(matches!(
            PixelBuffer::from_pixels(2, 2, vec![Rgb::WHITE; 3]),
            Err(PuzzleError::InvalidDimensions { .. })
        ));
        assert!(PixelBuffer::from_pixels(0, 2, Vec::new()).is_err());
    }

    #[test]
    fn test_buffer_bounds() {
        let buffer = PixelBuffer::new(80, 24);
        assert!(buffer.get(79, 23).is_some());
        assert!(buffer.get(80, 23).is_none());
        assert!(buffer.get(79, 24).is_none());
    }

    #[test]
    fn test_buffer_crop() {
        let image = gradient(30, 20);
        let piece = image.crop(10, 5, 10, 10).unwrap();
        assert_eq!(piece.width(), 10);
        assert_eq!(piece.get(0, 0), Some(Rgb::new(10, 5, 0)));
        assert_eq!(piece.get(9, 9), Some(Rgb::new(19, 14, 0)));

        assert!(image.crop(25, 0, 10, 10).is_none());
        assert!(image.crop(0, 0, 0, 10).is_none());
    }

    #[test]
    fn test_buffer_downsample() {
        let image = gradient(9, 4);
        let small = image.downsample(2);
        assert_eq!((small.width(), small.height()), (5, 2));
        assert_eq!(small.get(1, 1), Some(Rgb::new(2, 2, 0)));
        assert_eq!(image.downsample(1), image);
    }

    #[test]
    fn test_buffer_blit_scaled() {
        let src = PixelBuffer::from_fn(2, 2, |x, y| if x == y { Rgb::WHITE } else { Rgb::BLACK });
        let mut dest = PixelBuffer::filled(10, 10, Rgb::new(9, 9, 9));
        dest.blit_scaled(&src, Rect::new(2, 2, 4, 4));

        assert_eq!(dest.get(2, 2), Some(Rgb::WHITE));
        assert_eq!(dest.get(3, 3), Some(Rgb::WHITE));
        assert_eq!(dest.get(4, 2), Some(Rgb::BLACK));
        assert_eq!(dest.get(5, 5), Some(Rgb::WHITE));
        assert_eq!(dest.get(6, 6), Some(Rgb::new(9, 9, 9)));
    }

    #[test]
    fn test_buffer_blit_clips_offscreen() {
        let src = PixelBuffer::filled(4, 4, Rgb::WHITE);
        let mut dest = PixelBuffer::new(10, 10);
        dest.blit_scaled(&src, Rect::new(-2, -2, 4, 4));
        assert_eq!(dest.get(0, 0), Some(Rgb::WHITE));
        assert_eq!(dest.get(1, 1), Some(Rgb::WHITE));
        assert_eq!(dest.get(2, 2), Some(Rgb::BLACK));
    }

    #[test]
    fn test_buffer_stroke_rect() {
        let mut buffer = PixelBuffer::new(10, 10);
        buffer.stroke_rect(Rect::new(1, 1, 5, 5), Rgb::WHITE);
        assert_eq!(buffer.get(1, 1), Some(Rgb::WHITE));
        assert_eq!(buffer.get(5, 5), Some(Rgb::WHITE));
        assert_eq!(buffer.get(3, 3), Some(Rgb::BLACK));
        assert_eq!(buffer.get(6, 6), Some(Rgb::BLACK));
    }

    #[test]
    fn test_buffer_resize_clears() {
        let mut buffer = PixelBuffer::filled(4, 4, Rgb::WHITE);
        buffer.resize(8, 2);
        assert_eq!((buffer.width(), buffer.height()), (8, 2));
        assert_eq!(buffer.get(0, 0), Some(Rgb::BLACK));
    }
}
