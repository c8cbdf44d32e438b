//! Message types for actor communication.
//!
//! These define the protocol between the host input path, the interaction
//! controller and the render loop.

use crate::layout::Rect;
use crate::puzzle::PuzzleModel;
use std::sync::Arc;

/// One piece as the render loop should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Piece index.
    pub index: usize,
    /// Screen rectangle.
    pub rect: Rect,
    /// Whether the piece is locked into its target.
    pub locked: bool,
}

/// Immutable snapshot of every piece's screen state.
///
/// The controller publishes a fresh scene after each mutation; the render
/// loop swaps it in whole, so it never sees a half-updated rectangle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    /// Pieces in index order.
    pub sprites: Vec<Sprite>,
    /// Outline of the target area.
    pub frame: Rect,
}

impl Scene {
    /// Locked sprites, in index order.
    pub fn locked(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(|s| s.locked)
    }

    /// Loose sprites, in index order.
    pub fn loose(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(|s| !s.locked)
    }
}

/// Commands sent to the render loop.
#[derive(Debug)]
pub enum RenderCommand {
    /// Draw pieces from this model from now on.
    SetPuzzle(Arc<PuzzleModel>),

    /// Replace the scene being drawn.
    Scene(Arc<Scene>),

    /// The surface changed size.
    Resize {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },

    /// Stop drawing but keep the loop alive.
    Pause,

    /// Resume drawing after a pause.
    Resume,

    /// Terminate the render loop.
    Shutdown,
}

/// Events delivered by the host to the puzzle view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Pointer pressed.
    PointerDown {
        /// X coordinate in surface pixels.
        x: i32,
        /// Y coordinate in surface pixels.
        y: i32,
    },

    /// Pointer moved (dragging or hovering).
    PointerMove {
        /// X coordinate in surface pixels.
        x: i32,
        /// Y coordinate in surface pixels.
        y: i32,
    },

    /// Pointer released.
    PointerUp {
        /// X coordinate in surface pixels.
        x: i32,
        /// Y coordinate in surface pixels.
        y: i32,
    },

    /// Surface was resized.
    Resized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },

    /// Focus gained.
    FocusGained,

    /// Focus lost.
    FocusLost,

    /// A printable key was pressed.
    Key(char),

    /// The user asked to quit.
    Quit,

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}
