//! The drawable rectangle primitive shared by bars and the barrier.

use crate::surface::Surface;
use crate::types::Color;

/// How a rectangle is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Outline { thickness: u32 },
    Filled,
}

/// An axis-aligned rectangle with a paint style. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub color: Color,
    pub paint: Paint,
}

impl Rect {
    pub fn filled(x: i32, y: i32, width: i32, height: i32, color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color,
            paint: Paint::Filled,
        }
    }

    pub fn outline(x: i32, y: i32, width: i32, height: i32, color: Color, thickness: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color,
            paint: Paint::Outline { thickness },
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        match self.paint {
            Paint::Outline { thickness } => surface.paint_outline_rect(
                self.x,
                self.y,
                self.width,
                self.height,
                &self.color,
                thickness,
            ),
            Paint::Filled => {
                surface.paint_filled_rect(self.x, self.y, self.width, self.height, &self.color)
            }
        }
    }

    /// Erase what `draw` painted. An outline's stroke straddles its edges,
    /// so the four bands are erased rather than the interior.
    pub fn clear<S: Surface + ?Sized>(&self, surface: &mut S) {
        match self.paint {
            Paint::Outline { thickness } => {
                let t = thickness as i32;
                let (left, top) = (self.x - t / 2, self.y - t / 2);
                surface.erase_rect(left, top, self.width + t, t);
                surface.erase_rect(left, top + self.height, self.width + t, t);
                surface.erase_rect(left, top, t, self.height + t);
                surface.erase_rect(left + self.width, top, t, self.height + t);
            }
            Paint::Filled => surface.erase_rect(self.x, self.y, self.width, self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Canvas;

    #[test]
    fn clearing_an_outline_leaves_the_interior() {
        let mut canvas = Canvas::new(30, 30);
        canvas.paint_filled_rect(0, 0, 30, 30, &Color::GREY);
        let outline = Rect::outline(5, 5, 10, 10, Color::BLACK, 2);
        outline.draw(&mut canvas);
        assert!(canvas.count(&Color::BLACK) > 0);

        outline.clear(&mut canvas);
        assert_eq!(canvas.count(&Color::BLACK), 0);
        assert_eq!(canvas.pixel(8, 8), Some(&Color::GREY));
        assert_eq!(canvas.pixel(5, 5), None);
    }

    #[test]
    fn clearing_a_filled_rect_erases_its_area() {
        let mut canvas = Canvas::new(10, 10);
        let barrier = Rect::filled(1, 4, 8, 2, Color::BLACK);
        barrier.draw(&mut canvas);
        assert_eq!(canvas.count(&Color::BLACK), 16);

        barrier.clear(&mut canvas);
        assert_eq!(canvas.count(&Color::BLACK), 0);
    }
}
