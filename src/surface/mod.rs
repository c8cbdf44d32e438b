//! Surface module: the boundary between the engine and a drawing backend.
//!
//! A [`Surface`] owns the drawable region. The render loop locks a
//! [`DrawTarget`] from it once per frame, paints, and submits it back.
//! [`MemorySurface`] is a double-buffered in-memory implementation used by
//! headless hosts and tests.

mod memory;

pub use memory::MemorySurface;

use crate::buffer::{PixelBuffer, Rgb};
use crate::error::Result;
use crate::layout::Rect;

/// Something the render loop can paint a frame into.
pub trait DrawTarget {
    /// Size in pixels.
    fn size(&self) -> (u32, u32);

    /// Fill the whole target with one color.
    fn clear(&mut self, color: Rgb);

    /// Draw `image` scaled into `dest`, clipped to the target.
    fn draw_image(&mut self, image: &PixelBuffer, dest: Rect);

    /// Draw a one-pixel rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, color: Rgb);
}

impl DrawTarget for PixelBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn clear(&mut self, color: Rgb) {
        self.fill(color);
    }

    fn draw_image(&mut self, image: &PixelBuffer, dest: Rect) {
        self.blit_scaled(image, dest);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb) {
        Self::stroke_rect(self, rect, color);
    }
}

/// A drawable region owned by the host.
///
/// The render loop takes ownership of the surface for its lifetime, so
/// implementations share any state the host needs through their own handles.
pub trait Surface: Send + 'static {
    /// The per-frame draw target.
    type Target: DrawTarget;

    /// Whether targets can be acquired yet.
    fn is_ready(&self) -> bool;

    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Acquire an exclusive target for one frame.
    ///
    /// Fails with [`PuzzleError::SurfaceUnavailable`](crate::PuzzleError::SurfaceUnavailable)
    /// when the surface is not drawable right now.
    fn lock_target(&mut self) -> Result<Self::Target>;

    /// Release the target and present it.
    fn submit(&mut self, target: Self::Target) -> Result<()>;

    /// The host changed the surface size.
    fn resize(&mut self, _width: u32, _height: u32) {}
}
