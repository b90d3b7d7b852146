use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::types::Color;

use super::{Document, Surface};

/// A fixed-size pixel buffer. Each pixel is either empty or painted.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Option<Color>>,
    /// Bumped by every paint or erase call, clipped or not.
    revision: u64,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width as usize * height as usize],
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<&Color> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        self.pixels[y as usize * self.width as usize + x as usize].as_ref()
    }

    /// Number of pixels currently painted with `color`.
    pub fn count(&self, color: &Color) -> usize {
        self.pixels
            .iter()
            .filter(|p| p.as_ref() == Some(color))
            .count()
    }

    fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, value: Option<&Color>) {
        self.revision += 1;

        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + w as i64).min(self.width as i64);
        let y1 = (y as i64 + h as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width as usize;
        for py in y0 as usize..y1 as usize {
            let row = &mut self.pixels[py * stride..(py + 1) * stride];
            for p in &mut row[x0 as usize..x1 as usize] {
                *p = value.cloned();
            }
        }
    }
}

impl Surface for Canvas {
    /// Strokes along the rectangle edge: each side is a band `thickness`
    /// wide centred on the edge line, the way a 2-D canvas strokes.
    fn paint_outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: &Color, thickness: u32) {
        let t = thickness as i32;
        let half = t / 2;
        let (left, top) = (x - half, y - half);
        self.fill(left, top, w + t, t, Some(color));
        self.fill(left, top + h, w + t, t, Some(color));
        self.fill(left, top, t, h + t, Some(color));
        self.fill(left + w, top, t, h + t, Some(color));
    }

    fn paint_filled_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: &Color) {
        self.fill(x, y, w, h, Some(color));
    }

    fn erase_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.fill(x, y, w, h, None);
    }
}

/// Shared handle to a `Canvas`.
///
/// The demo is single-threaded, so clones just share the buffer; the host
/// keeps one clone to present it while the demo paints through another.
#[derive(Debug, Clone)]
pub struct CanvasHandle(Rc<RefCell<Canvas>>);

impl CanvasHandle {
    pub fn new(width: u32, height: u32) -> Self {
        Self(Rc::new(RefCell::new(Canvas::new(width, height))))
    }

    pub fn borrow(&self) -> Ref<'_, Canvas> {
        self.0.borrow()
    }
}

impl Surface for CanvasHandle {
    fn paint_outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: &Color, thickness: u32) {
        self.0.borrow_mut().paint_outline_rect(x, y, w, h, color, thickness);
    }

    fn paint_filled_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: &Color) {
        self.0.borrow_mut().paint_filled_rect(x, y, w, h, color);
    }

    fn erase_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.0.borrow_mut().erase_rect(x, y, w, h);
    }
}

/// A document holding named canvases.
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    surfaces: BTreeMap<String, CanvasHandle>,
}

impl CanvasDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(mut self, id: impl Into<String>, canvas: CanvasHandle) -> Self {
        self.insert(id, canvas);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, canvas: CanvasHandle) {
        self.surfaces.insert(id.into(), canvas);
    }
}

impl Document for CanvasDocument {
    type Surface = CanvasHandle;

    fn surface(&self, id: &str) -> Option<CanvasHandle> {
        self.surfaces.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_rect_is_clipped_to_bounds() {
        let mut canvas = Canvas::new(10, 10);
        canvas.paint_filled_rect(-5, 8, 8, 10, &Color::RED);

        assert_eq!(canvas.count(&Color::RED), 3 * 2);
        assert_eq!(canvas.pixel(0, 9), Some(&Color::RED));
        assert_eq!(canvas.pixel(3, 9), None);
    }

    #[test]
    fn outline_band_is_centred_on_the_edge() {
        let mut canvas = Canvas::new(20, 20);
        canvas.paint_outline_rect(5, 5, 6, 6, &Color::BLACK, 2);

        // Band covers edge - 1 ..= edge for thickness 2.
        assert_eq!(canvas.pixel(4, 4), Some(&Color::BLACK));
        assert_eq!(canvas.pixel(5, 5), Some(&Color::BLACK));
        assert_eq!(canvas.pixel(6, 6), None);
        assert_eq!(canvas.pixel(11, 11), Some(&Color::BLACK));
        assert_eq!(canvas.pixel(12, 12), None);
    }

    #[test]
    fn erase_empties_pixels_and_bumps_revision() {
        let mut canvas = Canvas::new(4, 4);
        canvas.paint_filled_rect(0, 0, 4, 4, &Color::GREEN);
        let before = canvas.revision();
        canvas.erase_rect(1, 1, 2, 2);

        assert_eq!(canvas.revision(), before + 1);
        assert_eq!(canvas.count(&Color::GREEN), 12);
        assert_eq!(canvas.pixel(1, 1), None);
    }

    #[test]
    fn document_resolves_only_known_ids() {
        let handle = CanvasHandle::new(2, 2);
        let doc = CanvasDocument::new().with_surface("demo", handle.clone());

        let mut surface = doc.surface("demo").expect("surface registered");
        surface.paint_filled_rect(0, 0, 1, 1, &Color::RED);
        assert_eq!(handle.borrow().pixel(0, 0), Some(&Color::RED));
        assert!(doc.surface("missing").is_none());
    }
}
