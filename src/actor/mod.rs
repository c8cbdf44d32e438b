//! Actor Model: Message-passing concurrency for the puzzle view.
//!
//! This module implements a small actor system using crossbeam channels:
//! - **Host thread**: Owns the [`InteractionController`] and applies input
//! - **Render Loop**: Receives scenes and lifecycle commands, draws continuously
//! - **Input Actor**: Polls terminal events for the terminal host
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     HostEvent       ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │ Host Thread  │
//! └──────────────┘                     │ (PuzzleView) │
//!                                      └──────────────┘
//!                                            │
//!                                            │ RenderCommand / Arc<Scene>
//!                                            ▼
//!                                      ┌──────────────┐
//!                                      │ Render Loop  │ ──▶ Surface
//!                                      └──────────────┘
//! ```
//!
//! The render loop reads piece images and lock flags from a shared
//! `Arc<PuzzleModel>`; screen rectangles reach it only as immutable scenes.

mod controller;
mod input;
mod messages;
mod renderer;
mod view;

pub use controller::{Gesture, InteractionController, ViewConfig};
pub use input::{convert_event, InputActor};
pub use messages::{HostEvent, RenderCommand, Scene, Sprite};
pub use renderer::{paint, Layers, RenderConfig, RenderLoop, RenderStats};
pub use view::PuzzleView;
