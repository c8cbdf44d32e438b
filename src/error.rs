//! Error types for puzzle construction and the render/interaction loops.
//!
//! Construction errors are returned to the caller. Runtime errors raised
//! inside the render loop are absorbed there: the frame is skipped and the
//! loop keeps running.

use thiserror::Error;

/// Errors produced by the puzzle engine.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// An image or grid was given a zero-sized dimension, or the grid is
    /// finer than the image it partitions.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Offending width (image width or column count).
        width: u32,
        /// Offending height (image height or row count).
        height: u32,
    },

    /// A piece index outside `0..count`.
    #[error("piece index {index} out of range (piece count {count})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of pieces in the puzzle.
        count: usize,
    },

    /// The drawable surface is not ready or its target could not be acquired.
    #[error("drawing surface unavailable")]
    SurfaceUnavailable,

    /// A frame failed while being drawn or submitted.
    #[error("frame render failed: {0}")]
    FrameRenderFailure(String),

    /// Image decoding failed.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Terminal or file I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PuzzleError>;
