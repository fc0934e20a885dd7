//! Life transition rule (B3/S23).

use super::GridView;

/// Per-cell transition: `(alive, live_neighbors) -> alive_next`.
pub type CellRule = fn(bool, u8) -> bool;

/// Conway's rule: a live cell survives with 2 or 3 neighbors,
/// a dead cell is born with exactly 3.
#[inline]
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2 | 3) | (false, 3))
}

/// Next state of `(row, col)` under Conway's rule.
#[inline]
pub fn evolve_cell(view: GridView<'_>, row: usize, col: usize) -> bool {
    next_state(view.get(row, col), view.live_neighbor_count(row, col))
}
