//! Compute module - Grid state and the parallel generation stepper.

mod grid;
mod partition;
mod rule;
mod simulation;
mod stepper;

pub use grid::*;
pub use partition::*;
pub use rule::*;
pub use simulation::*;
pub use stepper::*;
