//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.
//!
//! Frames are encoded as truecolor half blocks: each terminal cell shows two
//! vertically stacked pixels, the upper one as the foreground of `▀` and the
//! lower one as the background.

use crate::buffer::{PixelBuffer, Rgb};
use std::io::Write;

const UPPER_HALF_BLOCK: &str = "\u{2580}";

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// All output is accumulated here, then flushed in a single `write()` syscall
/// to prevent terminal flickering.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical terminal (64KB).
    pub fn new() -> Self {
        Self::with_capacity(64 * 1024)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H
        let _ = write!(self.data, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
    }

    /// Set foreground color (true color).
    #[inline]
    pub fn set_fg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Set background color (true color).
    #[inline]
    pub fn set_bg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Encode a whole frame as half blocks, starting at the top-left cell.
    ///
    /// Pixel rows `2r` and `2r + 1` become terminal row `r`; an odd final
    /// pixel row is paired with black. Color escapes are only emitted when
    /// the color changes from the previous cell.
    pub fn encode_half_blocks(&mut self, frame: &PixelBuffer) {
        let rows = frame.height().div_ceil(2);
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            self.cursor_move(0, row.min(u32::from(u16::MAX)) as u16);
            for x in 0..frame.width() {
                let upper = frame.get(x, row * 2).unwrap_or(Rgb::BLACK);
                let lower = frame.get(x, row * 2 + 1).unwrap_or(Rgb::BLACK);
                if fg != Some(upper) {
                    self.set_fg(upper);
                    fg = Some(upper);
                }
                if bg != Some(lower) {
                    self.set_bg(lower);
                    bg = Some(lower);
                }
                self.data.extend_from_slice(UPPER_HALF_BLOCK.as_bytes());
            }
        }
        self.reset_attrs();
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
