//! Simulation driver - steps, swaps, renders and paces generations.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::ThreadPoolBuildError;
use serde::Serialize;

use crate::display::Renderer;
use crate::schema::{ConfigError, SimulationConfig};

use super::{GenerationStepper, Grid, Partition, StepError};

/// Cloneable stop signal shared with a UI or input thread.
///
/// A stop request keeps the next generation from being launched. A
/// generation already in flight always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request the simulation to stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Reason the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// All configured generations were computed.
    Completed,
    /// A stop was requested through the [`StopHandle`].
    Stopped,
}

/// Outcome of a finished run.
#[derive(Debug)]
pub struct RunSummary {
    /// Board after the last completed generation.
    pub grid: Grid,
    /// Number of generations computed.
    pub generations: usize,
    /// Live cells on the final board.
    pub live_cells: usize,
    pub stop_reason: StopReason,
}

/// Simulation statistics for monitoring.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStats {
    pub generation: usize,
    pub live_cells: usize,
    pub total_cells: usize,
    pub density: f32,
}

impl SimulationStats {
    /// Compute statistics from a grid.
    pub fn from_grid(grid: &Grid, generation: usize) -> Self {
        let live_cells = grid.live_cells();
        let total_cells = grid.size() * grid.size();
        Self {
            generation,
            live_cells,
            total_cells,
            density: if total_cells == 0 {
                0.0
            } else {
                live_cells as f32 / total_cells as f32
            },
        }
    }
}

/// Errors that end a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] ThreadPoolBuildError),
    #[error("seed grid is {actual}x{actual}, expected {expected}x{expected}")]
    GridSize { expected: usize, actual: usize },
    #[error(
        "generation {generation} failed (last completed: {}): {source}",
        .last_completed.map_or_else(|| "none".to_string(), |g| g.to_string())
    )]
    Generation {
        generation: usize,
        last_completed: Option<usize>,
        /// Board as of the last completed generation.
        grid: Box<Grid>,
        #[source]
        source: StepError,
    },
    #[error("renderer failed after generation {generation}: {source}")]
    Render {
        generation: usize,
        #[source]
        source: io::Error,
    },
}

/// Runs a configured number of generations on a fork-join stepper.
pub struct Simulation {
    config: SimulationConfig,
    stepper: GenerationStepper,
    delay: Duration,
    stop: StopHandle,
}

impl Simulation {
    /// Validate the configuration and start the worker pool.
    ///
    /// Configuration errors surface here, before any worker exists.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let partition = Partition::new(config.board_size, config.partitions)?;
        let stepper = GenerationStepper::new(partition)?;
        let delay = config.delay();

        Ok(Self {
            config,
            stepper,
            delay,
            stop: StopHandle::default(),
        })
    }

    /// Override the pause between generations.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Get cancellation handle.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Get configuration reference.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get stepper reference.
    pub fn stepper(&self) -> &GenerationStepper {
        &self.stepper
    }

    /// Compute one generation and swap it in.
    ///
    /// On error the grid is left unswapped, still holding the previous generation.
    pub fn advance(&self, grid: &mut Grid) -> Result<(), StepError> {
        self.stepper.step(grid)?;
        grid.swap();
        Ok(())
    }

    /// Run all configured generations, rendering after each swap.
    pub fn run<R>(&self, mut grid: Grid, renderer: &mut R) -> Result<RunSummary, SimulationError>
    where
        R: Renderer + ?Sized,
    {
        if grid.size() != self.config.board_size {
            return Err(SimulationError::GridSize {
                expected: self.config.board_size,
                actual: grid.size(),
            });
        }

        let total = self.config.generations;
        let start = Instant::now();
        log::info!(
            "Starting {} generations on a {}x{} board with {} workers",
            total,
            grid.size(),
            grid.size(),
            self.stepper.workers()
        );

        let mut completed = 0;
        let mut stop_reason = StopReason::Completed;

        for generation in 0..total {
            if self.stop.is_stopped() {
                log::warn!("Stop requested, halting before generation {}", generation);
                stop_reason = StopReason::Stopped;
                break;
            }

            if let Err(source) = self.advance(&mut grid) {
                return Err(SimulationError::Generation {
                    generation,
                    last_completed: generation.checked_sub(1),
                    grid: Box::new(grid),
                    source,
                });
            }
            completed = generation + 1;

            log::debug!(
                "Generation {}/{}: {} live cells",
                completed,
                total,
                grid.live_cells()
            );

            renderer
                .render(&grid, generation, total)
                .map_err(|source| SimulationError::Render { generation, source })?;

            if !self.delay.is_zero() && completed < total {
                std::thread::sleep(self.delay);
            }
        }

        let elapsed = start.elapsed().as_secs_f32();
        let live_cells = grid.live_cells();
        log::info!(
            "Finished {} generations in {:.2}s ({:?}), {} live cells",
            completed,
            elapsed,
            stop_reason,
            live_cells
        );

        Ok(RunSummary {
            grid,
            generations: completed,
            live_cells,
            stop_reason,
        })
    }
}
