//! A bar that fills toward a capacity.

use crate::shapes::Rect;
use crate::surface::Surface;
use crate::types::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    outline: Rect,
    /// The empty background; the filled portion is painted inside its bounds.
    fill_rect: Rect,
    current_fill: u32,
    max_fill: u32,
    fill_color: Color,
    wait_color: Color,
}

impl Bar {
    pub fn new(outline: Rect, fill_rect: Rect, max_fill: u32, fill_color: Color, wait_color: Color) -> Self {
        Self {
            outline,
            fill_rect,
            current_fill: 0,
            max_fill,
            fill_color,
            wait_color,
        }
    }

    pub fn current_fill(&self) -> u32 {
        self.current_fill
    }

    pub fn max_fill(&self) -> u32 {
        self.max_fill
    }

    pub fn outline(&self) -> &Rect {
        &self.outline
    }

    pub fn fill_rect(&self) -> &Rect {
        &self.fill_rect
    }

    pub fn is_complete(&self) -> bool {
        self.current_fill == self.max_fill
    }

    /// Advance by `amount`, landing exactly on `max_fill` instead of
    /// overshooting it.
    pub fn fill(&mut self, amount: u32) {
        self.current_fill = self.current_fill.saturating_add(amount).min(self.max_fill);
    }

    /// Overwrite the fill level. Not clamped.
    pub fn set_current_fill(&mut self, value: u32) {
        self.current_fill = value;
    }

    /// Overwrite the capacity. Not clamped against the current fill.
    pub fn set_max_fill(&mut self, value: u32) {
        self.max_fill = value;
    }

    /// The color the filled portion is painted with right now.
    pub fn level_color(&self) -> &Color {
        if self.is_complete() {
            &self.wait_color
        } else {
            &self.fill_color
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.outline.draw(surface);
        self.fill_rect.draw(surface);

        // The level never paints past the background, whatever the fill.
        let r = &self.fill_rect;
        let level = i32::try_from(self.current_fill).unwrap_or(i32::MAX).min(r.height);
        surface.paint_filled_rect(r.x, r.y, r.width, level, self.level_color());
    }
}
