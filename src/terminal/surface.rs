//! `TerminalSurface`: a [`Surface`] that presents frames to a terminal.

use super::output::OutputBuffer;
use crate::buffer::PixelBuffer;
use crate::error::{PuzzleError, Result};
use crate::surface::Surface;
use std::io::{self, Stdout, Write};

/// Draws frames as truecolor half blocks.
///
/// The surface is `columns` pixels wide and `rows * 2` pixels tall. Each
/// submitted frame is encoded into one [`OutputBuffer`] and written with a
/// single call.
pub struct TerminalSurface<W: Write + Send + 'static = Stdout> {
    writer: W,
    output: OutputBuffer,
    width: u32,
    height: u32,
    back: Option<PixelBuffer>,
}

impl TerminalSurface<Stdout> {
    /// Surface covering the whole current terminal, writing to stdout.
    pub fn stdout() -> Result<Self> {
        let (columns, rows) = crossterm::terminal::size()?;
        Ok(Self::new(io::stdout(), columns, rows))
    }
}

impl<W: Write + Send + 'static> TerminalSurface<W> {
    /// Surface of `columns` x `rows` cells writing to `writer`.
    pub fn new(writer: W, columns: u16, rows: u16) -> Self {
        Self {
            writer,
            output: OutputBuffer::new(),
            width: u32::from(columns),
            height: u32::from(rows) * 2,
            back: None,
        }
    }

    /// The underlying writer.
    pub const fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write + Send + 'static> Surface for TerminalSurface<W> {
    type Target = PixelBuffer;

    fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn lock_target(&mut self) -> Result<PixelBuffer> {
        if !self.is_ready() {
            return Err(PuzzleError::SurfaceUnavailable);
        }
        let mut back = self
            .back
            .take()
            .unwrap_or_else(|| PixelBuffer::new(self.width, self.height));
        back.resize(self.width, self.height);
        Ok(back)
    }

    fn submit(&mut self, target: PixelBuffer) -> Result<()> {
        self.output.clear();
        self.output.encode_half_blocks(&target);
        self.back = Some(target);
        self.output
            .flush_to(&mut self.writer)
            .map_err(|e| PuzzleError::FrameRenderFailure(e.to_string()))
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;

    #[test]
    fn test_size_is_half_block_pixels() {
        let surface = TerminalSurface::new(Vec::new(), 80, 24);
        assert_eq!(surface.size(), (80, 48));
        assert!(surface.is_ready());
    }

    #[test]
    fn test_submit_writes_one_frame() {
        let mut surface = TerminalSurface::new(Vec::new(), 2, 1);
        let mut target = surface.lock_target().unwrap();
        assert_eq!((target.width(), target.height()), (2, 2));
        target.fill(Rgb::new(1, 2, 3));
        surface.submit(target).unwrap();

        let text = String::from_utf8(surface.writer().clone()).unwrap();
        assert!(text.starts_with("\x1b[1;1H"));
        assert_eq!(text.matches('\u{2580}').count(), 2);
        assert!(text.contains("\x1b[38;2;1;2;3m"));
    }

    #[test]
    fn test_resize_changes_target_size() {
        let mut surface = TerminalSurface::new(Vec::new(), 2, 1);
        let target = surface.lock_target().unwrap();
        surface.submit(target).unwrap();
        surface.resize(4, 6);
        let target = surface.lock_target().unwrap();
        assert_eq!((target.width(), target.height()), (4, 6));
    }

    #[test]
    fn test_zero_size_is_unavailable() {
        let mut surface = TerminalSurface::new(Vec::new(), 0, 0);
        assert!(!surface.is_ready());
        assert!(matches!(surface.lock_target(), Err(PuzzleError::SurfaceUnavailable)));
    }
}
