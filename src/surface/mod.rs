//! Surface — where the demo paints.
//!
//! The core only ever talks to a `Surface`, which it obtains once per phase
//! setup by asking a `Document` for a named surface. `canvas` provides the
//! in-memory implementation used by the terminal host and by tests.

mod canvas;

pub use canvas::{Canvas, CanvasDocument, CanvasHandle};

use crate::types::Color;

/// A drawing target with the three rectangle operations the demo needs.
///
/// Coordinates are in surface pixels. Implementations clip anything outside
/// their bounds.
pub trait Surface {
    fn paint_outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: &Color, thickness: u32);
    fn paint_filled_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: &Color);
    fn erase_rect(&mut self, x: i32, y: i32, w: i32, h: i32);
}

/// The hosting document: resolves a surface by its identifier.
pub trait Document {
    type Surface: Surface;

    fn surface(&self, id: &str) -> Option<Self::Surface>;
}
