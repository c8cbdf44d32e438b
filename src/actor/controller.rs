//! Interaction controller: hit-testing and the drag/snap state machine.
//!
//! Gesture states:
//!
//! ```text
//!            down on loose piece            move inside own target
//!   Idle ─────────────────────────▶ Dragging ───────────────────────▶ Snapped
//!    ▲                                 │ move elsewhere: follow pointer   │
//!    │            up                   ▼                                  │
//!    └─────────────────────────────────┴──────────────────────────────────┘
//! ```
//!
//! The controller owns every piece's screen rectangle. It runs on the thread
//! delivering pointer events and publishes a [`Scene`] snapshot to the render
//! loop after each change.

use super::messages::{RenderCommand, Scene, Sprite};
use crate::layout::Rect;
use crate::puzzle::PuzzleModel;
use crossbeam_channel::Sender;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// On-screen geometry of a puzzle.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Side length every piece is drawn at, whatever its source size.
    pub piece_size: i32,
    /// Left edge of the target grid.
    pub lock_zone_left: i32,
    /// Top edge of the target grid.
    pub lock_zone_top: i32,
    /// Surface size used for scattering until the host reports one.
    pub surface_size: (u32, u32),
    /// Seed for the scatter; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            piece_size: 100,
            lock_zone_left: 20,
            lock_zone_top: 20,
            surface_size: (800, 600),
            seed: None,
        }
    }
}

/// Current gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// No piece held.
    Idle,
    /// A loose piece follows the pointer.
    Dragging(usize),
    /// The held piece snapped into its target during this gesture.
    Snapped(usize),
}

/// Drives pieces from loose to locked in response to pointer events.
pub struct InteractionController {
    /// Shared puzzle state.
    model: Arc<PuzzleModel>,
    /// Geometry.
    config: ViewConfig,
    /// Screen rectangle per piece.
    screen: Vec<Rect>,
    /// Target rectangle per piece.
    targets: Vec<Rect>,
    /// Outline of the whole target grid.
    frame: Rect,
    /// The piece held by the current gesture.
    grabbed: Option<usize>,
    /// Size used for scattering.
    surface_size: (u32, u32),
    /// Scatter randomness.
    rng: StdRng,
    /// Channel to the render loop.
    publisher: Option<Sender<RenderCommand>>,
}

impl InteractionController {
    /// Create a controller and scatter every piece.
    pub fn new(model: Arc<PuzzleModel>, config: ViewConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let (targets, frame) = Self::layout_targets(&model, &config);
        let mut controller = Self {
            screen: vec![Rect::ZERO; model.piece_count()],
            surface_size: config.surface_size,
            model,
            config,
            targets,
            frame,
            grabbed: None,
            rng,
            publisher: None,
        };
        controller.scatter();
        controller
    }

    /// Publish scenes to the render loop through `publisher`.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Sender<RenderCommand>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Attach or detach the render loop channel.
    ///
    /// While detached, mutations are not published anywhere.
    pub fn set_publisher(&mut self, publisher: Option<Sender<RenderCommand>>) {
        self.publisher = publisher;
    }

    /// Target rectangle for each piece, plus the outline around all of them.
    fn layout_targets(model: &PuzzleModel, config: &ViewConfig) -> (Vec<Rect>, Rect) {
        let grid = model.grid();
        let size = config.piece_size;
        let mut targets = vec![Rect::ZERO; model.piece_count()];

        for col in 0..grid.columns {
            for row in 0..grid.rows {
                if let Some(index) = model.target_slot(col, row) {
                    targets[index] = Rect::new(
                        config.lock_zone_left + col as i32 * size,
                        config.lock_zone_top + row as i32 * size,
                        size,
                        size,
                    );
                }
            }
        }

        let frame = Rect::new(
            config.lock_zone_left,
            config.lock_zone_top,
            grid.columns as i32 * size,
            grid.rows as i32 * size,
        );
        (targets, frame)
    }

    /// Give every loose piece a random screen position.
    ///
    /// Top-left corners fall in `[0, width - size)` x `[0, height - 2 * size)`,
    /// each range clamped to at least one pixel.
    pub fn scatter(&mut self) {
        let size = self.config.piece_size;
        let (width, height) = self.surface_size;
        let max_x = (width as i32 - size).max(1);
        let max_y = (height as i32 - 2 * size).max(1);

        for index in 0..self.screen.len() {
            if self.model.is_locked(index) {
                self.screen[index] = self.targets[index];
                continue;
            }
            let x = self.rng.gen_range(0..max_x);
            let y = self.rng.gen_range(0..max_y);
            self.screen[index] = Rect::new(x, y, size, size);
        }
        self.publish();
    }

    /// Unlock every piece, drop any held piece and scatter again.
    pub fn reset(&mut self) {
        self.model.reset_locks();
        self.grabbed = None;
        self.scatter();
        log::info!("puzzle reset");
    }

    /// Record a new surface size for later scatters.
    ///
    /// Pieces already on screen keep their positions.
    pub const fn set_surface_size(&mut self, width: u32, height: u32) {
        self.surface_size = (width, height);
    }

    /// The shared puzzle model.
    #[inline]
    pub const fn model(&self) -> &Arc<PuzzleModel> {
        &self.model
    }

    /// The piece held by the current gesture.
    #[inline]
    pub const fn grabbed(&self) -> Option<usize> {
        self.grabbed
    }

    /// Current gesture state.
    pub fn gesture(&self) -> Gesture {
        match self.grabbed {
            None => Gesture::Idle,
            Some(index) if self.model.is_locked(index) => Gesture::Snapped(index),
            Some(index) => Gesture::Dragging(index),
        }
    }

    /// Screen rectangle of a piece.
    pub fn screen_rect(&self, index: usize) -> Option<Rect> {
        self.screen.get(index).copied()
    }

    /// Target rectangle of a piece.
    pub fn target_rect(&self, index: usize) -> Option<Rect> {
        self.targets.get(index).copied()
    }

    /// Outline of the target grid.
    #[inline]
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    /// Move a loose piece's screen rectangle. Locked or unknown pieces are ignored.
    pub fn place_piece(&mut self, index: usize, rect: Rect) -> bool {
        if self.model.is_locked(index) {
            return false;
        }
        let Some(slot) = self.screen.get_mut(index) else {
            return false;
        };
        *slot = rect;
        self.publish();
        true
    }

    /// Topmost loose piece under `(x, y)`.
    ///
    /// Loose pieces are drawn in index order, so the scan runs from the
    /// highest index down.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<usize> {
        (0..self.screen.len())
            .rev()
            .find(|&index| !self.model.is_locked(index) && self.screen[index].contains(x, y))
    }

    /// Pointer pressed: grab the topmost loose piece under it.
    ///
    /// Returns `true` if a piece was grabbed.
    pub fn pointer_down(&mut self, x: i32, y: i32) -> bool {
        self.grabbed = self.hit_test(x, y);
        let Some(index) = self.grabbed else {
            return false;
        };

        let place = self.screen[index];
        log::debug!("grabbed piece {index} at ({x}, {y})");
        self.model.on_piece_grabbed(index, place.x, place.y);
        true
    }

    /// Pointer moved: snap into the target or follow the pointer.
    ///
    /// Returns `true` if the held piece changed.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> bool {
        let Some(index) = self.grabbed else {
            return false;
        };
        if index >= self.screen.len() || self.model.is_locked(index) {
            return false;
        }

        let target = self.targets[index];
        if target.contains(x, y) {
            self.screen[index] = target;
            self.model.set_locked(index, true);
            log::debug!("piece {index} locked into {target:?}");
            self.publish();

            self.model.on_piece_moved(index, target.x, target.y);
            self.model.on_piece_dropped(index, target.x, target.y);
        } else {
            let rect = Rect::centered_on(x, y, self.config.piece_size);
            self.screen[index] = rect;
            self.publish();

            self.model.on_piece_moved(index, rect.x, rect.y);
        }
        true
    }

    /// Pointer released: drop the held piece, if any.
    ///
    /// Returns `true` if a piece was held.
    pub fn pointer_up(&mut self, x: i32, y: i32) -> bool {
        let Some(index) = self.grabbed.take() else {
            return false;
        };
        if index < self.screen.len() {
            self.model.on_piece_dropped(index, x, y);
        }
        true
    }

    /// Snapshot of every piece for the render loop.
    pub fn scene(&self) -> Scene {
        Scene {
            sprites: self
                .screen
                .iter()
                .enumerate()
                .map(|(index, &rect)| Sprite {
                    index,
                    rect,
                    locked: self.model.is_locked(index),
                })
                .collect(),
            frame: self.frame,
        }
    }

    /// Send the current scene to the render loop.
    pub fn publish(&self) {
        if let Some(publisher) = &self.publisher {
            let _ = publisher.send(RenderCommand::Scene(Arc::new(self.scene())));
        }
    }
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("pieces", &self.screen.len())
            .field("gesture", &self.gesture())
            .field("surface_size", &self.surface_size)
            .finish_non_exhaustive()
    }
}
