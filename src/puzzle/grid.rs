//! Grid partitioning: piece size and grid topology from an image size.

use crate::buffer::PixelBuffer;
use crate::error::{PuzzleError, Result};

/// Explicit column/row counts for a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpec {
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
}

impl GridSpec {
    /// Create a new grid spec.
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }
}

/// Piece dimensions and grid topology.
///
/// Always satisfies `columns * piece_width <= image width` and
/// `rows * piece_height <= image height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuzzleGrid {
    /// Width of every piece in source pixels.
    pub piece_width: u32,
    /// Height of every piece in source pixels.
    pub piece_height: u32,
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
}

impl PuzzleGrid {
    /// Total number of pieces.
    #[inline]
    pub const fn piece_count(&self) -> usize {
        (self.columns as usize) * (self.rows as usize)
    }

    /// Piece index for grid coordinate `(col, row)`: `col * rows + row`.
    ///
    /// Returns `None` outside the grid.
    #[inline]
    pub const fn slot(&self, col: u32, row: u32) -> Option<usize> {
        if col < self.columns && row < self.rows {
            Some((col as usize) * (self.rows as usize) + row as usize)
        } else {
            None
        }
    }

    /// Grid coordinate `(col, row)` of a piece index.
    #[inline]
    pub const fn coords_of(&self, index: usize) -> Option<(u32, u32)> {
        if index < self.piece_count() {
            let rows = self.rows as usize;
            Some(((index / rows) as u32, (index % rows) as u32))
        } else {
            None
        }
    }
}

/// Greatest common divisor (Euclid, iterative).
pub const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Compute the grid for an image of `width` x `height`.
///
/// With no spec the pieces are squares of side `gcd(width, height)` and the
/// image is covered exactly. Coprime sizes give 1x1 pieces; that outcome is
/// returned as-is. With a spec the piece size is the floor of the division,
/// so a remainder strip on the right and bottom belongs to no piece.
pub fn compute_grid(width: u32, height: u32, spec: Option<GridSpec>) -> Result<PuzzleGrid> {
    if width == 0 || height == 0 {
        return Err(PuzzleError::InvalidDimensions { width, height });
    }

    let grid = match spec {
        None => {
            let side = gcd(width, height);
            PuzzleGrid {
                piece_width: side,
                piece_height: side,
                columns: width / side,
                rows: height / side,
            }
        }
        Some(GridSpec { columns, rows }) => {
            if columns == 0 || rows == 0 {
                return Err(PuzzleError::InvalidDimensions {
                    width: columns,
                    height: rows,
                });
            }
            let grid = PuzzleGrid {
                piece_width: width / columns,
                piece_height: height / rows,
                columns,
                rows,
            };
            if grid.piece_width == 0 || grid.piece_height == 0 {
                return Err(PuzzleError::InvalidDimensions {
                    width: grid.piece_width,
                    height: grid.piece_height,
                });
            }
            grid
        }
    };
    Ok(grid)
}

/// Cut `image` into pieces in column-major order (index = `col * rows + row`).
pub fn partition(image: &PixelBuffer, spec: Option<GridSpec>) -> Result<(PuzzleGrid, Vec<PixelBuffer>)> {
    let grid = compute_grid(image.width(), image.height(), spec)?;

    let mut pieces = Vec::with_capacity(grid.piece_count());
    for col in 0..grid.columns {
        for row in 0..grid.rows {
            let piece = image
                .crop(
                    col * grid.piece_width,
                    row * grid.piece_height,
                    grid.piece_width,
                    grid.piece_height,
                )
                .ok_or(PuzzleError::InvalidDimensions {
                    width: image.width(),
                    height: image.height(),
                })?;
            pieces.push(piece);
        }
    }

    Ok((grid, pieces))
}
