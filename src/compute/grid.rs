//! Double-buffered toroidal cell grid.
//!
//! Cells are stored as flat row-major buffers: `cells[row * size + col]`.
//! Reads go to `current`, generation output goes to `next`, and [`Grid::swap`]
//! exchanges the two without copying.

use std::fmt;

/// Square board of boolean cells on a torus.
#[derive(Clone)]
pub struct Grid {
    size: usize,
    current: Vec<bool>,
    next: Vec<bool>,
}

impl Grid {
    /// Create an all-dead `size` x `size` grid.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero; a torus needs at least one cell.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "grid size must be at least 1");
        Self {
            size,
            current: vec![false; size * size],
            next: vec![false; size * size],
        }
    }

    /// Create a grid with the given cells alive. Coordinates wrap around the torus.
    pub fn from_live_cells<I>(size: usize, cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut grid = Self::new(size);
        for (row, col) in cells {
            grid.set(row, col, true);
        }
        grid
    }

    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        (row % self.size) * self.size + col % self.size
    }

    /// Read a cell of the current generation.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.current[self.idx(row, col)]
    }

    /// Write a cell of the current generation.
    ///
    /// Only meant for seeding; the stepper never writes `current`.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        let idx = self.idx(row, col);
        self.current[idx] = alive;
    }

    /// Flip a cell of the current generation.
    pub fn toggle(&mut self, row: usize, col: usize) {
        let idx = self.idx(row, col);
        self.current[idx] = !self.current[idx];
    }

    /// Write a cell of the next generation.
    pub fn set_next(&mut self, row: usize, col: usize, alive: bool) {
        let idx = self.idx(row, col);
        self.next[idx] = alive;
    }

    /// Count live cells among the 8 toroidal neighbors of `(row, col)`.
    pub fn live_neighbor_count(&self, row: usize, col: usize) -> u8 {
        self.view().live_neighbor_count(row, col)
    }

    /// Make `next` the current generation. The old buffer becomes `next`.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Number of live cells in the current generation.
    pub fn live_cells(&self) -> usize {
        self.current.iter().filter(|&&alive| alive).count()
    }

    /// Current generation as a flat row-major slice.
    pub fn cells(&self) -> &[bool] {
        &self.current
    }

    /// Rows of the current generation, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.current.chunks(self.size)
    }

    /// Read-only view of the current generation.
    pub fn view(&self) -> GridView<'_> {
        GridView {
            size: self.size,
            cells: &self.current,
        }
    }

    /// Borrow `current` for reading and `next` for writing at the same time.
    pub(crate) fn split_buffers(&mut self) -> (GridView<'_>, &mut [bool]) {
        (
            GridView {
                size: self.size,
                cells: &self.current,
            },
            &mut self.next,
        )
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.current == other.current
    }
}

impl Eq for Grid {}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.size, self.size)?;
        for row in self.rows() {
            let line: String = row.iter().map(|&alive| if alive { 'X' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Shared read-only view of a generation, handed to every worker.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    size: usize,
    cells: &'a [bool],
}

impl GridView<'_> {
    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Read a cell, wrapping coordinates around the torus.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[(row % self.size) * self.size + col % self.size]
    }

    /// Count live cells among the 8 toroidal neighbors of `(row, col)`.
    pub fn live_neighbor_count(&self, row: usize, col: usize) -> u8 {
        let size = self.size;
        // size - 1 is -1 modulo size
        let offsets = [size - 1, 0, 1];
        let mut count = 0;
        for (i, dr) in offsets.into_iter().enumerate() {
            for (j, dc) in offsets.into_iter().enumerate() {
                // skip the center by position; on a 1x1 board every offset is 0
                if i == 1 && j == 1 {
                    continue;
                }
                if self.get(row % size + dr, col % size + dc) {
                    count += 1;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_dead() {
        let grid = Grid::new(8);
        assert_eq!(grid.size(), 8);
        assert_eq!(grid.live_cells(), 0);
        assert_eq!(grid.cells().len(), 64);
    }

    #[test]
    #[should_panic(expected = "grid size must be at least 1")]
    fn test_zero_size_rejected() {
        Grid::new(0);
    }

    #[test]
    fn test_single_cell_torus() {
        // every neighbor of the only cell is the cell itself
        let grid = Grid::from_live_cells(1, [(0, 0)]);
        assert_eq!(grid.live_neighbor_count(0, 0), 8);
    }

    #[test]
    fn test_diagonal_wraparound() {
        let grid = Grid::from_live_cells(6, [(5, 5)]);
        assert_eq!(grid.live_neighbor_count(0, 0), 1);
        assert_eq!(grid.live_neighbor_count(0, 5), 1);
        assert_eq!(grid.live_neighbor_count(5, 0), 1);
        assert_eq!(grid.live_neighbor_count(2, 2), 0);
    }

    #[test]
    fn test_neighbor_count_excludes_self() {
        let mut grid = Grid::new(5);
        for row in 0..5 {
            for col in 0..5 {
                grid.set(row, col, true);
            }
        }
        assert_eq!(grid.live_neighbor_count(2, 2), 8);
        assert_eq!(grid.live_neighbor_count(0, 4), 8);
    }

    #[test]
    fn test_coordinates_wrap() {
        let mut grid = Grid::new(4);
        grid.set(5, 6, true);
        assert!(grid.get(1, 2));
        grid.toggle(1, 2);
        assert!(!grid.get(1, 2));
    }

    #[test]
    fn test_swap_exchanges_buffers() {
        let mut grid = Grid::from_live_cells(4, [(0, 0)]);
        grid.set_next(3, 3, true);
        grid.swap();

        assert!(!grid.get(0, 0));
        assert!(grid.get(3, 3));

        // the old current buffer is now the next buffer
        grid.swap();
        assert!(grid.get(0, 0));
    }

    #[test]
    fn test_equality_ignores_next_buffer() {
        let a = Grid::from_live_cells(4, [(1, 1)]);
        let mut b = a.clone();
        b.set_next(2, 2, true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rows() {
        let grid = Grid::from_live_cells(3, [(1, 2)]);
        let rows: Vec<&[bool]> = grid.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], &[false, false, true]);
    }
}
