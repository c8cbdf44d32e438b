//! Puzzle construction options.

use super::grid::GridSpec;
use crate::image_source::ImageSource;

/// Bounding box for heuristically gridded puzzles.
pub const DYNAMIC_TARGET_SIZE: (u32, u32) = (450, 300);
/// Bounding box for explicitly gridded puzzles.
pub const CONFIGURED_TARGET_SIZE: (u32, u32) = (400, 300);
/// Bounding box for the background texture.
pub const BACKGROUND_TARGET_SIZE: (u32, u32) = (800, 800);

/// Options for building a [`PuzzleModel`](super::PuzzleModel).
#[derive(Debug, Clone)]
pub struct PuzzleOptions {
    /// Source image for the pieces.
    pub image: ImageSource,
    /// Explicit grid; `None` derives square pieces from the gcd of the
    /// scaled image size.
    pub grid: Option<GridSpec>,
    /// Optional background texture drawn behind the pieces.
    pub background: Option<ImageSource>,
    /// Whether the background texture is drawn.
    pub background_texture_enabled: bool,
}

impl PuzzleOptions {
    /// Options for a heuristically gridded puzzle of `image`.
    pub fn new(image: impl Into<ImageSource>) -> Self {
        Self {
            image: image.into(),
            grid: None,
            background: None,
            background_texture_enabled: true,
        }
    }

    /// Use an explicit column/row grid.
    #[must_use]
    pub fn with_grid(mut self, columns: u32, rows: u32) -> Self {
        self.grid = Some(GridSpec::new(columns, rows));
        self
    }

    /// Set the background texture.
    #[must_use]
    pub fn with_background(mut self, background: impl Into<ImageSource>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// Enable or disable drawing the background texture.
    #[must_use]
    pub fn with_background_enabled(mut self, enabled: bool) -> Self {
        self.background_texture_enabled = enabled;
        self
    }

    /// The box the source image is scaled into.
    pub const fn target_size(&self) -> (u32, u32) {
        if self.grid.is_some() {
            CONFIGURED_TARGET_SIZE
        } else {
            DYNAMIC_TARGET_SIZE
        }
    }
}
