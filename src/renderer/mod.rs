//! Renderer — turns the pixel canvas into terminal cells.
//!
//! The renderer is pure and stateless. Each terminal cell covers a
//! `cell_w × cell_h` block of canvas pixels and shows two samples of it with
//! a half-block glyph: the block's top-left pixel as the upper half and the
//! pixel half a cell further down as the lower half.

use crate::surface::Canvas;
use crate::types::{Cell, CellChange, Color, Style};

const UPPER_HALF: char = '\u{2580}';
const LOWER_HALF: char = '\u{2584}';

pub struct Renderer;

impl Renderer {
    /// Terminal size, in cells, needed to show `canvas`.
    pub fn grid_size(canvas: &Canvas, cell_w: u32, cell_h: u32) -> (u16, u16) {
        let cols = canvas.width().div_ceil(cell_w);
        let rows = canvas.height().div_ceil(cell_h);
        (cols.min(u16::MAX as u32) as u16, rows.min(u16::MAX as u32) as u16)
    }

    pub fn rasterize(canvas: &Canvas, cell_w: u32, cell_h: u32) -> Vec<Vec<Cell>> {
        let (cols, rows) = Self::grid_size(canvas, cell_w, cell_h);
        let half = (cell_h / 2) as i32;

        (0..rows as i32)
            .map(|row| {
                (0..cols as i32)
                    .map(|col| {
                        let x = col * cell_w as i32;
                        let y = row * cell_h as i32;
                        Self::cell(canvas.pixel(x, y), canvas.pixel(x, y + half))
                    })
                    .collect()
            })
            .collect()
    }

    fn cell(top: Option<&Color>, bottom: Option<&Color>) -> Cell {
        match (top, bottom) {
            (None, None) => Cell::default(),
            (Some(top), bottom) => Cell {
                ch: UPPER_HALF,
                style: Style {
                    fg: Some(top.clone()),
                    bg: bottom.cloned(),
                    ..Default::default()
                },
            },
            (None, Some(bottom)) => Cell {
                ch: LOWER_HALF,
                style: Style {
                    fg: Some(bottom.clone()),
                    ..Default::default()
                },
            },
        }
    }

    /// Compute a cell-level diff between two grids.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }
}
