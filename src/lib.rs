//! # Jigsaw
//!
//! A threaded jigsaw puzzle engine.
//!
//! An image is cut into a grid of equal rectangular pieces, the pieces are
//! scattered over a drawing surface, and the user drags them with a pointer.
//! A piece released over its own slot snaps into place and locks. A dedicated
//! render loop redraws the surface continuously.
//!
//! ## Core Concepts
//!
//! - **Grid partitioning**: Square-ish pieces from the gcd of the image sides
//! - **Lock table**: One atomic flag per piece, shared across threads
//! - **Scenes**: Immutable snapshots of piece rectangles, published per mutation
//! - **Actor model**: Host thread for input, render thread for drawing
//!
//! ## Example
//!
//! ```rust,ignore
//! use jigsaw::{MemorySurface, PuzzleModel, PuzzleView, PixelBuffer};
//!
//! let model = PuzzleModel::new(PixelBuffer::new(300, 200), None)?;
//! let mut view = PuzzleView::default();
//! view.set_puzzle(model);
//! view.on_surface_ready(MemorySurface::new(800, 600))?;
//! view.on_pointer_down(120, 80);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod error;
pub mod image_source;
pub mod layout;
pub mod puzzle;
pub mod surface;
pub mod terminal;

// Re-exports for convenience
pub use actor::{
    Gesture, HostEvent, InputActor, InteractionController, Layers, PuzzleView, RenderCommand,
    RenderConfig, RenderLoop, RenderStats, Scene, Sprite, ViewConfig,
};
pub use buffer::{PixelBuffer, Rgb};
pub use error::{PuzzleError, Result};
pub use image_source::{load_and_scale, sample_ratio, ImageSource};
pub use layout::Rect;
pub use puzzle::{
    compute_grid, partition, GridSpec, NoopEvents, PuzzleEvents, PuzzleGrid, PuzzleModel,
    PuzzleOptions,
};
pub use surface::{DrawTarget, MemorySurface, Surface};
pub use terminal::{TerminalSession, TerminalSurface};
