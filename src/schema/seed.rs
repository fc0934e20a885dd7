//! Seed types and input providers for initializing simulations.

use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::compute::Grid;

/// Outcome of asking an [`InputProvider`] for a starting board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seeding {
    /// Board ready to simulate.
    Ready(Grid),
    /// The user backed out of configuration. Not an error.
    Cancelled,
}

/// Supplies the initial board before a run starts.
pub trait InputProvider {
    /// Produce a `board_size` x `board_size` board, or report cancellation.
    fn provide(&mut self, board_size: usize) -> Result<Seeding, SeedError>;
}

/// Errors produced while building a seed board.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("board size must be at least 1")]
    EmptyBoard,
    #[error("failed to read seed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse seed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cell ({row}, {col}) is outside the {size}x{size} board")]
    CellOutOfBounds { row: usize, col: usize, size: usize },
    #[error("density {0} is outside [0, 1]")]
    InvalidDensity(f64),
    #[error("row {row} has {len} cells, board is only {size} wide")]
    RowTooLong { row: usize, len: usize, size: usize },
    #[error("cell map has more than {size} rows")]
    TooManyRows { size: usize },
    #[error("unexpected character {ch:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, ch: char },
}

/// Complete seed specification for simulation initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Random {
                density: 0.3,
                seed: 42,
            },
        }
    }
}

/// Predefined patterns for initialization.
///
/// Pattern origins are the top-left corner of the pattern's bounding box
/// and wrap around the torus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// 2x2 still life.
    Block { origin: (usize, usize) },
    /// Three cells in a line, period 2.
    Blinker {
        origin: (usize, usize),
        #[serde(default)]
        vertical: bool,
    },
    /// Five-cell spaceship heading down and right.
    Glider { origin: (usize, usize) },
    /// Explicit list of live `(row, col)` cells. Must lie on the board.
    Cells { cells: Vec<(usize, usize)> },
    /// Each cell alive with probability `density`.
    Random {
        density: f64,
        /// Random seed.
        seed: u64,
    },
    /// Several patterns laid over each other.
    Multi { patterns: Vec<Pattern> },
}

impl Pattern {
    fn apply(&self, grid: &mut Grid) -> Result<(), SeedError> {
        match self {
            Pattern::Block { origin } => place(grid, *origin, &[(0, 0), (0, 1), (1, 0), (1, 1)]),
            Pattern::Blinker { origin, vertical } => {
                let cells: &[(usize, usize)] = if *vertical {
                    &[(0, 0), (1, 0), (2, 0)]
                } else {
                    &[(0, 0), (0, 1), (0, 2)]
                };
                place(grid, *origin, cells);
            }
            Pattern::Glider { origin } => {
                place(grid, *origin, &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)])
            }
            Pattern::Cells { cells } => {
                let size = grid.size();
                for &(row, col) in cells {
                    if row >= size || col >= size {
                        return Err(SeedError::CellOutOfBounds { row, col, size });
                    }
                    grid.set(row, col, true);
                }
            }
            Pattern::Random { density, seed } => {
                if !(0.0..=1.0).contains(density) {
                    return Err(SeedError::InvalidDensity(*density));
                }
                let mut rng = StdRng::seed_from_u64(*seed);
                let size = grid.size();
                for row in 0..size {
                    for col in 0..size {
                        if rng.gen_bool(*density) {
                            grid.set(row, col, true);
                        }
                    }
                }
            }
            Pattern::Multi { patterns } => {
                for pattern in patterns {
                    pattern.apply(grid)?;
                }
            }
        }
        Ok(())
    }
}

fn place(grid: &mut Grid, origin: (usize, usize), offsets: &[(usize, usize)]) {
    let size = grid.size();
    let (row, col) = (origin.0 % size, origin.1 % size);
    for &(dr, dc) in offsets {
        grid.set(row + dr, col + dc, true);
    }
}

impl Seed {
    /// Load a seed from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Generate the initial board from this seed.
    pub fn generate(&self, board_size: usize) -> Result<Grid, SeedError> {
        if board_size == 0 {
            return Err(SeedError::EmptyBoard);
        }
        let mut grid = Grid::new(board_size);
        self.pattern.apply(&mut grid)?;
        Ok(grid)
    }
}

impl InputProvider for Seed {
    fn provide(&mut self, board_size: usize) -> Result<Seeding, SeedError> {
        self.generate(board_size).map(Seeding::Ready)
    }
}

/// Reads a board drawn as text, one line per row.
///
/// `X`, `x`, `O`, `o`, `#` and `*` are live cells; `.`, `-`, `b` and spaces are dead.
/// A line holding only `q` cancels. A blank line or end of input finishes
/// the board; rows and columns not drawn are dead.
pub struct TextInput<R> {
    reader: R,
}

impl<R: BufRead> TextInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> InputProvider for TextInput<R> {
    fn provide(&mut self, board_size: usize) -> Result<Seeding, SeedError> {
        if board_size == 0 {
            return Err(SeedError::EmptyBoard);
        }
        let mut grid = Grid::new(board_size);
        let mut row = 0;

        for line in (&mut self.reader).lines() {
            let line = line?;
            let line = line.trim_end();
            if line.eq_ignore_ascii_case("q") {
                return Ok(Seeding::Cancelled);
            }
            if line.is_empty() {
                break;
            }
            if row >= board_size {
                return Err(SeedError::TooManyRows { size: board_size });
            }

            let len = line.chars().count();
            if len > board_size {
                return Err(SeedError::RowTooLong {
                    row,
                    len,
                    size: board_size,
                });
            }

            for (col, ch) in line.chars().enumerate() {
                match ch {
                    'X' | 'x' | 'O' | 'o' | '#' | '*' => grid.set(row, col, true),
                    '.' | '-' | 'b' | ' ' => {}
                    _ => return Err(SeedError::InvalidCell { row, col, ch }),
                }
            }
            row += 1;
        }

        Ok(Seeding::Ready(grid))
    }
}
