//! Layout module: view-space geometry shared by the controller and renderer.

mod rect;

pub use rect::Rect;
