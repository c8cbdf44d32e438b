//! PuzzleModel: authoritative puzzle topology and lock state.
//!
//! Topology (image, grid, piece buffers, target table) is fixed once built.
//! Only the lock bits change afterwards, and they are atomics so the model
//! can be shared as `Arc<PuzzleModel>` between the input path and the render
//! loop without a mutex.

use super::config::{PuzzleOptions, BACKGROUND_TARGET_SIZE};
use super::events::{NoopEvents, PuzzleEvents};
use super::grid::{partition, GridSpec, PuzzleGrid};
use crate::buffer::PixelBuffer;
use crate::error::{PuzzleError, Result};
use crate::image_source::load_and_scale;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Puzzle state: image, pieces, target slots and lock table.
pub struct PuzzleModel {
    /// The scaled source image.
    image: PixelBuffer,
    /// Grid topology.
    grid: PuzzleGrid,
    /// Piece buffers in column-major order.
    pieces: Vec<PixelBuffer>,
    /// `targets[col][row]` is the piece index belonging in that slot.
    targets: Vec<Vec<usize>>,
    /// Lock bit per piece.
    locked: Vec<AtomicBool>,
    /// Optional background texture.
    background: Option<PixelBuffer>,
    background_enabled: AtomicBool,
    /// Event listener.
    events: Arc<dyn PuzzleEvents>,
}

impl PuzzleModel {
    /// Build a puzzle from an already scaled image.
    ///
    /// `spec = None` derives square pieces from the gcd of the image size.
    pub fn new(image: PixelBuffer, spec: Option<GridSpec>) -> Result<Self> {
        let (grid, pieces) = partition(&image, spec)?;
        log_grid(&grid, &image);
        Ok(Self {
            targets: target_table(&grid),
            locked: lock_table(pieces.len()),
            image,
            grid,
            pieces,
            background: None,
            background_enabled: AtomicBool::new(true),
            events: Arc::new(NoopEvents),
        })
    }

    /// Load, scale and partition the images named in `options`.
    pub fn from_options(options: &PuzzleOptions) -> Result<Self> {
        let (target_width, target_height) = options.target_size();
        let image = load_and_scale(&options.image, target_width, target_height)?;
        let mut model = Self::new(image, options.grid)?;

        if let Some(source) = &options.background {
            let (bg_width, bg_height) = BACKGROUND_TARGET_SIZE;
            model.background = Some(load_and_scale(source, bg_width, bg_height)?);
        }
        model.set_background_texture_enabled(options.background_texture_enabled);
        Ok(model)
    }

    /// Attach an event listener.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn PuzzleEvents>) -> Self {
        self.events = events;
        self
    }

    /// Replace the event listener.
    pub fn set_events(&mut self, events: Arc<dyn PuzzleEvents>) {
        self.events = events;
    }

    /// Partition `image` and replace the whole grid, pieces and lock table.
    ///
    /// On error the previous grid is left untouched.
    pub fn build_grid(&mut self, image: PixelBuffer, spec: Option<GridSpec>) -> Result<()> {
        let (grid, pieces) = partition(&image, spec)?;
        log_grid(&grid, &image);

        self.targets = target_table(&grid);
        self.locked = lock_table(pieces.len());
        self.image = image;
        self.grid = grid;
        self.pieces = pieces;
        Ok(())
    }

    /// The grid topology.
    #[inline]
    pub const fn grid(&self) -> &PuzzleGrid {
        &self.grid
    }

    /// The scaled source image.
    #[inline]
    pub const fn image(&self) -> &PixelBuffer {
        &self.image
    }

    /// `(image width, image height, columns, rows)`.
    pub const fn dimensions(&self) -> (u32, u32, u32, u32) {
        (self.image.width(), self.image.height(), self.grid.columns, self.grid.rows)
    }

    /// Number of pieces.
    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// All piece buffers, indexed by piece id.
    #[inline]
    pub fn pieces(&self) -> &[PixelBuffer] {
        &self.pieces
    }

    /// Get a piece buffer, or `None` for an out-of-range index.
    #[inline]
    pub fn piece(&self, index: usize) -> Option<&PixelBuffer> {
        self.pieces.get(index)
    }

    /// Get a piece buffer, reporting out-of-range indices as an error.
    pub fn try_piece(&self, index: usize) -> Result<&PixelBuffer> {
        self.pieces.get(index).ok_or(PuzzleError::IndexOutOfRange {
            index,
            count: self.pieces.len(),
        })
    }

    /// Piece index belonging in grid slot `(col, row)`.
    ///
    /// Always `col * rows + row` inside the grid, `None` outside it.
    pub fn target_slot(&self, col: u32, row: u32) -> Option<usize> {
        self.targets.get(col as usize)?.get(row as usize).copied()
    }

    /// Whether a piece is locked. Out-of-range indices report `false`.
    #[inline]
    pub fn is_locked(&self, index: usize) -> bool {
        self.locked
            .get(index)
            .is_some_and(|bit| bit.load(Ordering::Acquire))
    }

    /// Set a piece's lock bit. Out-of-range indices are ignored.
    #[inline]
    pub fn set_locked(&self, index: usize, locked: bool) {
        if let Some(bit) = self.locked.get(index) {
            bit.store(locked, Ordering::Release);
        }
    }

    /// Number of locked pieces.
    pub fn locked_count(&self) -> usize {
        self.locked
            .iter()
            .filter(|bit| bit.load(Ordering::Acquire))
            .count()
    }

    /// Whether every piece is locked into its target.
    pub fn is_solved(&self) -> bool {
        !self.locked.is_empty() && self.locked_count() == self.locked.len()
    }

    /// Unlock every piece.
    pub fn reset_locks(&self) {
        for bit in &self.locked {
            bit.store(false, Ordering::Release);
        }
    }

    /// The background texture, if one was loaded.
    #[inline]
    pub const fn background(&self) -> Option<&PixelBuffer> {
        self.background.as_ref()
    }

    /// Set the background texture.
    pub fn set_background(&mut self, background: Option<PixelBuffer>) {
        self.background = background;
    }

    /// Whether the background texture is drawn.
    pub fn is_background_texture_enabled(&self) -> bool {
        self.background_enabled.load(Ordering::Relaxed)
    }

    /// Enable or disable drawing the background texture.
    pub fn set_background_texture_enabled(&self, enabled: bool) {
        self.background_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Notify the listener that a piece was grabbed.
    pub fn on_piece_grabbed(&self, index: usize, x: i32, y: i32) {
        self.events.on_piece_grabbed(index, x, y);
    }

    /// Notify the listener that a piece moved.
    pub fn on_piece_moved(&self, index: usize, x: i32, y: i32) {
        self.events.on_piece_moved(index, x, y);
    }

    /// Notify the listener that a piece was dropped.
    pub fn on_piece_dropped(&self, index: usize, x: i32, y: i32) {
        self.events.on_piece_dropped(index, x, y);
    }
}

/// Identity table: the piece cut from `(col, row)` belongs in `(col, row)`.
fn target_table(grid: &PuzzleGrid) -> Vec<Vec<usize>> {
    (0..grid.columns)
        .map(|col| {
            (0..grid.rows)
                .map(|row| (col as usize) * (grid.rows as usize) + row as usize)
                .collect()
        })
        .collect()
}

fn lock_table(count: usize) -> Vec<AtomicBool> {
    (0..count).map(|_| AtomicBool::new(false)).collect()
}

fn log_grid(grid: &PuzzleGrid, image: &PixelBuffer) {
    log::debug!(
        "built {}x{} grid of {}x{} pieces from {}x{} image",
        grid.columns,
        grid.rows,
        grid.piece_width,
        grid.piece_height,
        image.width(),
        image.height()
    );
}

impl std::fmt::Debug for PuzzleModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PuzzleModel")
            .field("grid", &self.grid)
            .field("locked", &self.locked_count())
            .field("background", &self.background.is_some())
            .finish_non_exhaustive()
    }
}
