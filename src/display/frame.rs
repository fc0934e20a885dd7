//! Mutex-guarded frame hand-off for renderers on another thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::compute::Grid;

use super::Renderer;

/// Snapshot of one finished generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub size: usize,
    /// Row-major cells.
    pub cells: Vec<bool>,
    /// 0-based index of the generation shown.
    pub generation: usize,
    pub total: usize,
}

impl Frame {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.size + col]
    }

    pub fn live_cells(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }
}

/// Latest frame, shared between the simulation thread and a display thread.
///
/// The simulation publishes through [`Renderer::render`]; readers call
/// [`FrameSlot::latest`] or [`FrameSlot::with_latest`]. A frame is only ever
/// published whole, so a reader never sees a grid mid-swap.
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    inner: Arc<Mutex<Option<Frame>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Frame>> {
        // A panicked reader cannot leave a half-written frame behind
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the most recent frame, if any was published.
    pub fn latest(&self) -> Option<Frame> {
        self.lock().clone()
    }

    /// Run `f` on the most recent frame while holding the lock.
    pub fn with_latest<T>(&self, f: impl FnOnce(Option<&Frame>) -> T) -> T {
        let guard = self.lock();
        f(guard.as_ref())
    }

    /// Generation index of the most recent frame.
    pub fn generation(&self) -> Option<usize> {
        self.lock().as_ref().map(|frame| frame.generation)
    }

    /// Publish a grid, reusing the previous frame's buffer when possible.
    pub fn publish(&self, grid: &Grid, generation: usize, total: usize) {
        let mut slot = self.lock();
        match slot.as_mut() {
            Some(frame) => {
                frame.size = grid.size();
                frame.cells.clear();
                frame.cells.extend_from_slice(grid.cells());
                frame.generation = generation;
                frame.total = total;
            }
            None => {
                *slot = Some(Frame {
                    size: grid.size(),
                    cells: grid.cells().to_vec(),
                    generation,
                    total,
                });
            }
        }
    }
}

impl Renderer for FrameSlot {
    fn render(&mut self, grid: &Grid, generation: usize, total: usize) -> std::io::Result<()> {
        self.publish(grid, generation, total);
        Ok(())
    }
}
