//! Display module - Hand-off of finished generations to a presentation layer.
//!
//! The simulation loop calls a [`Renderer`] synchronously after every buffer
//! swap. [`TextRenderer`] draws straight to a writer; [`FrameSlot`] publishes
//! frames behind a mutex for a display running on another thread.

mod frame;
mod renderer;

pub use frame::{Frame, FrameSlot};
pub use renderer::{Renderer, TextRenderer};
