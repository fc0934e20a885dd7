//! Renderer trait and a plain-text terminal renderer.

use std::io::{self, Write};

use crate::compute::Grid;

/// Receives each generation after the swap.
///
/// Renderers must not keep references to the grid beyond the call.
pub trait Renderer {
    /// Present `grid` as generation `generation` (0-based) of `total`.
    fn render(&mut self, grid: &Grid, generation: usize, total: usize) -> io::Result<()>;
}

impl<F> Renderer for F
where
    F: FnMut(&Grid, usize, usize),
{
    fn render(&mut self, grid: &Grid, generation: usize, total: usize) -> io::Result<()> {
        self(grid, generation, total);
        Ok(())
    }
}

/// ANSI: cursor home, clear screen.
const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Draws the board as text, one glyph per cell, inside a border.
///
/// ```text
/// +----+
/// | X  |
/// |  X |
/// |XXX |
/// |    |
/// +----+
/// Generation: 1/10
/// ```
pub struct TextRenderer<W: Write> {
    out: W,
    alive: char,
    dead: char,
    clear_screen: bool,
    /// Reused line buffer.
    line: String,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            alive: 'X',
            dead: ' ',
            clear_screen: false,
            line: String::new(),
        }
    }

    /// Use custom glyphs for live and dead cells.
    pub fn with_glyphs(mut self, alive: char, dead: char) -> Self {
        self.alive = alive;
        self.dead = dead;
        self
    }

    /// Clear the terminal before each frame.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn border(&mut self, size: usize) -> io::Result<()> {
        writeln!(self.out, "+{}+", "-".repeat(size))
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, grid: &Grid, generation: usize, total: usize) -> io::Result<()> {
        if self.clear_screen {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }

        let (alive, dead) = (self.alive, self.dead);
        self.border(grid.size())?;
        for row in grid.rows() {
            self.line.clear();
            self.line.push('|');
            self.line
                .extend(row.iter().map(|&cell| if cell { alive } else { dead }));
            self.line.push('|');
            writeln!(self.out, "{}", self.line)?;
        }
        self.border(grid.size())?;

        writeln!(self.out, "Generation: {}/{}", generation + 1, total)?;
        self.out.flush()
    }
}
