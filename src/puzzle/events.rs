//! Piece event hooks for embedding applications.

/// Observer of piece interaction events.
///
/// Every method defaults to a no-op. Hooks run synchronously on the thread
/// delivering pointer events, so a slow implementation delays the next
/// pointer event; hand heavy work off to another thread.
///
/// Coordinates are the piece's top-left corner, except for the drop fired
/// on pointer-up, which reports the pointer position.
pub trait PuzzleEvents: Send + Sync {
    /// A piece was picked up.
    fn on_piece_grabbed(&self, _index: usize, _x: i32, _y: i32) {}

    /// A grabbed piece moved (or snapped into its target).
    fn on_piece_moved(&self, _index: usize, _x: i32, _y: i32) {}

    /// A piece was released, or committed by snapping into its target.
    fn on_piece_dropped(&self, _index: usize, _x: i32, _y: i32) {}
}

/// Listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl PuzzleEvents for NoopEvents {}
