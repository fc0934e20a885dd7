//! Game of Life on a torus, stepped in parallel.
//!
//! The M x M board is cut into N x N equal square subregions. Every
//! generation forks one worker per subregion onto a reusable thread pool,
//! joins them all, and only then swaps the double-buffered grid.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration types and seed input providers
//! - `compute`: Grid, Life rule, partitioning, fork-join stepper and driver loop
//! - `display`: Renderer trait, text renderer and cross-thread frame hand-off
//!
//! # Example
//!
//! ```rust,no_run
//! use gol_threads::{
//!     compute::Simulation,
//!     display::TextRenderer,
//!     schema::{InputProvider, Pattern, Seed, Seeding, SimulationConfig},
//! };
//!
//! // 64x64 board, 4x4 workers, 200 generations
//! let config = SimulationConfig::new(64, 4, 200);
//!
//! let mut seed = Seed {
//!     pattern: Pattern::Glider { origin: (1, 1) },
//! };
//! let Seeding::Ready(grid) = seed.provide(config.board_size).unwrap() else {
//!     return;
//! };
//!
//! let simulation = Simulation::new(config).unwrap();
//! let mut renderer = TextRenderer::new(std::io::stdout()).with_clear_screen(true);
//! let summary = simulation.run(grid, &mut renderer).unwrap();
//!
//! println!("Live cells after {} generations: {}", summary.generations, summary.live_cells);
//! ```

pub mod compute;
pub mod display;
pub mod schema;

// Re-export commonly used types
pub use compute::{GenerationStepper, Grid, Partition, Simulation, SimulationStats, StopHandle};
pub use display::{FrameSlot, Renderer, TextRenderer};
pub use schema::{InputProvider, Pattern, Seed, Seeding, SimulationConfig};
