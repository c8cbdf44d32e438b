//! MemorySurface: double-buffered in-memory surface.

use super::Surface;
use crate::buffer::PixelBuffer;
use crate::error::{PuzzleError, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A surface that presents frames into a shared pixel buffer.
///
/// Clones share the presented (front) buffer and the ready flag, so a host
/// can hand one clone to the render loop and inspect frames through another.
#[derive(Clone)]
pub struct MemorySurface {
    /// Presented frame.
    front: Arc<Mutex<PixelBuffer>>,
    /// Whether targets can be acquired.
    ready: Arc<AtomicBool>,
    /// Number of presented frames.
    presented: Arc<AtomicU64>,
    /// Buffer being drawn, recycled between frames.
    back: Option<PixelBuffer>,
}

impl MemorySurface {
    /// Create a ready surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            front: Arc::new(Mutex::new(PixelBuffer::new(width, height))),
            ready: Arc::new(AtomicBool::new(true)),
            presented: Arc::new(AtomicU64::new(0)),
            back: None,
        }
    }

    /// Mark the surface ready or not ready.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Copy of the last presented frame.
    pub fn snapshot(&self) -> Option<PixelBuffer> {
        self.front.lock().ok().map(|front| front.clone())
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented.load(Ordering::Acquire)
    }
}

impl Surface for MemorySurface {
    type Target = PixelBuffer;

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn size(&self) -> (u32, u32) {
        self.front
            .lock()
            .map(|front| (front.width(), front.height()))
            .unwrap_or((0, 0))
    }

    fn lock_target(&mut self) -> Result<PixelBuffer> {
        if !self.is_ready() {
            return Err(PuzzleError::SurfaceUnavailable);
        }
        let (width, height) = self.size();
        if width == 0 || height == 0 {
            return Err(PuzzleError::SurfaceUnavailable);
        }
        let mut back = self
            .back
            .take()
            .unwrap_or_else(|| PixelBuffer::new(width, height));
        back.resize(width, height);
        Ok(back)
    }

    fn submit(&mut self, mut target: PixelBuffer) -> Result<()> {
        let mut front = self
            .front
            .lock()
            .map_err(|e| PuzzleError::FrameRenderFailure(e.to_string()))?;
        if front.width() == target.width() && front.height() == target.height() {
            std::mem::swap(&mut *front, &mut target);
            self.back = Some(target);
        }
        drop(front);
        self.presented.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Ok(mut front) = self.front.lock() {
            front.resize(width, height);
        }
        self.back = None;
    }
}

impl std::fmt::Debug for MemorySurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySurface")
            .field("size", &self.size())
            .field("ready", &self.is_ready())
            .field("presented", &self.presented())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;
    use crate::surface::DrawTarget;

    #[test]
    fn test_memory_surface_present() {
        let mut surface = MemorySurface::new(4, 4);
        let viewer = surface.clone();

        let mut target = surface.lock_target().unwrap();
        target.clear(Rgb::WHITE);
        surface.submit(target).unwrap();

        assert_eq!(viewer.presented(), 1);
        assert_eq!(viewer.snapshot().unwrap().get(3, 3), Some(Rgb::WHITE));
    }

    #[test]
    fn test_memory_surface_not_ready() {
        let mut surface = MemorySurface::new(4, 4);
        surface.set_ready(false);
        assert!(matches!(surface.lock_target(), Err(PuzzleError::SurfaceUnavailable)));
    }

    #[test]
    fn test_memory_surface_resize() {
        let mut surface = MemorySurface::new(4, 4);
        surface.resize(8, 2);
        assert_eq!(surface.size(), (8, 2));
        let target = surface.lock_target().unwrap();
        assert_eq!(target.size(), (8, 2));
    }
}
