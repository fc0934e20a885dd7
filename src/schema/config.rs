//! Configuration types for simulation parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default pause between generations, matching a human-watchable animation.
fn default_delay_ms() -> u64 {
    100
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Board side length in cells (M).
    pub board_size: usize,
    /// Subregions per axis (N). N * N workers run each generation.
    pub partitions: usize,
    /// Number of generations to compute (MAX).
    pub generations: usize,
    /// Pause between generations in milliseconds. 0 runs flat out.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            board_size: 32,
            partitions: 2,
            generations: 100,
            delay_ms: default_delay_ms(),
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with the default delay.
    pub fn new(board_size: usize, partitions: usize, generations: usize) -> Self {
        Self {
            board_size,
            partitions,
            generations,
            delay_ms: default_delay_ms(),
        }
    }

    /// Number of workers per generation (N * N).
    #[inline]
    pub fn workers(&self) -> usize {
        self.partitions * self.partitions
    }

    /// Side length of each subregion (M / N).
    #[inline]
    pub fn subregion_size(&self) -> usize {
        self.board_size / self.partitions.max(1)
    }

    /// Pause between generations.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::ZeroBoardSize);
        }
        if self.partitions == 0 {
            return Err(ConfigError::ZeroPartitions);
        }
        if self.board_size % self.partitions != 0 {
            return Err(ConfigError::IndivisibleBoard {
                board_size: self.board_size,
                partitions: self.partitions,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Board size must be non-zero")]
    ZeroBoardSize,
    #[error("Partition count must be non-zero")]
    ZeroPartitions,
    #[error("Board size {board_size} must be divisible by partition count {partitions}")]
    IndivisibleBoard { board_size: usize, partitions: usize },
}
