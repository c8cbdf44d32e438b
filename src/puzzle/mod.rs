//! Puzzle module: grid partitioning and the shared puzzle model.
//!
//! - [`grid`]: piece size and topology from image dimensions
//! - [`PuzzleModel`]: pieces, target slots and the lock table
//! - [`PuzzleEvents`]: overridable piece event hooks
//! - [`PuzzleOptions`]: construction options

mod config;
mod events;
pub mod grid;
mod model;

pub use config::{PuzzleOptions, BACKGROUND_TARGET_SIZE, CONFIGURED_TARGET_SIZE, DYNAMIC_TARGET_SIZE};
pub use events::{NoopEvents, PuzzleEvents};
pub use grid::{compute_grid, gcd, partition, GridSpec, PuzzleGrid};
pub use model::PuzzleModel;
