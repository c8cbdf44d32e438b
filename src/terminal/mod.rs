//! Terminal host: a crossterm backend for the puzzle view.
//!
//! [`TerminalSession`] owns raw mode, [`TerminalSurface`] presents frames as
//! half-block characters and [`InputActor`](crate::actor::InputActor) turns
//! terminal input into host events.

mod output;
mod session;
mod surface;

pub use output::OutputBuffer;
pub use session::{SessionConfig, TerminalSession};
pub use surface::TerminalSurface;
