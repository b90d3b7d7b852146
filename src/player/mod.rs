//! Player — the terminal host.
//!
//! Owns a canvas registered under the configured identifier, hands it to a
//! `Demo`, and drives the demo's timers against the wall clock, presenting
//! the canvas after every poll. The first frame is drawn in full; later
//! frames only repaint the cells that changed.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossterm::{cursor, event, execute, queue, style, terminal};

use crate::config::DemoConfig;
use crate::demo::{Demo, Stage};
use crate::renderer::Renderer;
use crate::surface::{CanvasDocument, CanvasHandle};
use crate::types::{Cell, Color, NamedColor, Style};

/// Rows reserved above the canvas for the key hint.
const CANVAS_OFFSET: u16 = 1;

pub struct Player {
    demo: Demo<CanvasDocument>,
    canvas: CanvasHandle,
    grid: Vec<Vec<Cell>>,
    cell_w: u32,
    cell_h: u32,
    hold: Duration,
}

/// What the player does once the terminal is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run both phases, then hold the final frame.
    Run,
    /// Show the starting state only.
    Preview,
}

impl Player {
    pub fn new(config: DemoConfig) -> Result<Self> {
        let (w, h) = config.canvas_size();
        let canvas = CanvasHandle::new(w, h);
        let document = CanvasDocument::new().with_surface(config.canvas.clone(), canvas.clone());
        let cell_w = config.view.cell_width;
        let cell_h = config.view.cell_height;
        let hold = Duration::from_millis(config.view.hold_ms);

        Ok(Self {
            demo: Demo::new(config, document)?,
            canvas,
            grid: Vec::new(),
            cell_w,
            cell_h,
            hold,
        })
    }

    /// Play in the terminal.
    ///
    /// Sets up the terminal, runs, and restores the terminal on exit (even on
    /// error).
    pub fn play(&mut self, mode: Mode) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let (need_w, need_h) = Renderer::grid_size(&self.canvas.borrow(), self.cell_w, self.cell_h);
        // +2: one row for the key hint, one row for the status line
        if term_w < need_w || term_h < need_h + 2 {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                need_w,
                need_h + 2,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = match mode {
            Mode::Run => self.run_loop(&mut stdout),
            Mode::Preview => self.preview(&mut stdout),
        };

        // Always restore terminal state.
        self.demo.stop();
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Driving the demo
    // -----------------------------------------------------------------------

    fn preview(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.demo.pre_start()?;
        self.render_hint(stdout)?;
        self.render_full(stdout)?;
        self.render_status(stdout)?;
        wait_for_quit(None)?;
        Ok(())
    }

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.demo.start(Instant::now())?;
        self.render_hint(stdout)?;
        self.render_full(stdout)?;
        self.render_status(stdout)?;

        while !self.demo.is_finished() {
            let now = Instant::now();
            let wait = self
                .demo
                .next_deadline()
                .map_or(Duration::ZERO, |due| due.saturating_duration_since(now));
            if wait_for_quit(Some(wait))? {
                tracing::info!("quit requested");
                return Ok(());
            }

            self.demo.poll(Instant::now())?;
            self.render_diff(stdout)?;
            self.render_status(stdout)?;
        }

        wait_for_quit(Some(self.hold))?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_hint(&self, stdout: &mut io::Stdout) -> Result<()> {
        let bold = to_content_style(&Style {
            bold: true,
            ..Default::default()
        });
        let dim = to_content_style(&Style {
            dim: true,
            ..Default::default()
        });

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
            style::PrintStyledContent(style::StyledContent::new(bold, "[q][Esc]")),
            style::PrintStyledContent(style::StyledContent::new(dim, " quit")),
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn render_full(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.grid = Renderer::rasterize(&self.canvas.borrow(), self.cell_w, self.cell_h);
        for (y, row) in self.grid.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
            for cell in row {
                let cs = to_content_style(&cell.style);
                queue!(
                    stdout,
                    style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_diff(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let next = Renderer::rasterize(&self.canvas.borrow(), self.cell_w, self.cell_h);
        for change in Renderer::diff(&self.grid, &next) {
            let cs = to_content_style(&change.cell.style);
            queue!(
                stdout,
                cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
            )?;
        }
        self.grid = next;
        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = self.grid.len() as u16 + CANVAS_OFFSET;
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        let total = self.demo.bars().len();
        let status = match self.demo.stage() {
            None => format!(" Ready | {total} bars "),
            Some(Stage::PhaseOne) => {
                format!(" Phase one | {}/{total} bars filling ", self.demo.active_bars())
            }
            Some(Stage::Pause) => " Barrier reached | releasing ".to_string(),
            Some(Stage::PhaseTwo) => {
                format!(" Phase two | {}/{total} bars filling ", self.demo.active_bars())
            }
            Some(Stage::Done) => " Done ".to_string(),
            Some(Stage::Stopped) => " Stopped ".to_string(),
        };

        let cs = to_content_style(&Style {
            dim: true,
            ..Default::default()
        });

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        stdout.flush()?;
        Ok(())
    }
}

/// Wait up to `timeout` (forever if `None`) for a quit key. Returns whether
/// one was pressed. Any other input is ignored.
fn wait_for_quit(timeout: Option<Duration>) -> Result<bool> {
    let deadline = timeout.map(|t| Instant::now() + t);
    loop {
        let remaining = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Ok(false);
                }
                deadline - now
            }
            None => Duration::from_secs(3600),
        };
        if !event::poll(remaining)? {
            continue;
        }
        if let event::Event::Key(key) = event::read()? {
            use event::KeyCode::*;
            let ctrl_c = key.code == Char('c') && key.modifiers.contains(event::KeyModifiers::CONTROL);
            if matches!(key.code, Char('q') | Esc) || ctrl_c {
                return Ok(true);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}
