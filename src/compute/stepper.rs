//! Fork-join generation stepper.
//!
//! One worker per subregion runs on a rayon pool sized to the partition.
//! Every worker reads the shared `current` buffer and writes only its own
//! slice of `next`. The slices are carved out of `next` with safe borrow
//! splitting, so no locking is needed between workers.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use super::{CellRule, Grid, GridView, Partition, Subregion, next_state};

/// Fault raised inside a single worker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkerFailure {
    #[error("worker {index}: slice of the next buffer does not match subregion {region}")]
    Bounds { index: usize, region: Subregion },
    #[error("worker {index} panicked: {message}")]
    Panicked { index: usize, message: String },
}

impl WorkerFailure {
    /// Index of the subregion whose worker failed.
    pub fn index(&self) -> usize {
        match self {
            WorkerFailure::Bounds { index, .. } | WorkerFailure::Panicked { index, .. } => *index,
        }
    }
}

/// A generation that could not be computed. The grid must not be swapped.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("partition covers a {expected}x{expected} board but the grid is {actual}x{actual}")]
    PartitionBounds { expected: usize, actual: usize },
    #[error(
        "{} of {workers} workers failed; first: {}",
        .failures.len(),
        .failures.first().map_or_else(|| "none".to_string(), ToString::to_string)
    )]
    Workers {
        workers: usize,
        failures: Vec<WorkerFailure>,
    },
}

/// Rows of one subregion's share of the `next` buffer.
struct TileWriter<'a> {
    index: usize,
    region: Subregion,
    rows: Vec<&'a mut [bool]>,
}

/// Computes generations in parallel, one worker per subregion.
pub struct GenerationStepper {
    pool: ThreadPool,
    partition: Partition,
    rule: CellRule,
}

impl GenerationStepper {
    /// Create a stepper with a worker pool of one thread per subregion.
    pub fn new(partition: Partition) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(partition.len())
            .thread_name(|i| format!("gol-worker-{}", i))
            .build()?;

        log::debug!(
            "Worker pool ready: {} threads for a {}x{} board",
            partition.len(),
            partition.board_size(),
            partition.board_size()
        );

        Ok(Self {
            pool,
            partition,
            rule: next_state,
        })
    }

    /// Replace the per-cell transition rule.
    pub fn with_rule(mut self, rule: CellRule) -> Self {
        self.rule = rule;
        self
    }

    /// Get partition reference.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Number of workers forked per generation.
    pub fn workers(&self) -> usize {
        self.partition.len()
    }

    /// Compute the next generation of `grid` into its `next` buffer.
    ///
    /// All workers are spawned before any is joined, and this returns only
    /// once every worker has finished. Failures from all workers are
    /// collected into a single [`StepError::Workers`]. The caller swaps the
    /// grid after a successful step.
    pub fn step(&self, grid: &mut Grid) -> Result<(), StepError> {
        if grid.size() != self.partition.board_size() {
            return Err(StepError::PartitionBounds {
                expected: self.partition.board_size(),
                actual: grid.size(),
            });
        }

        let rule = self.rule;
        let (current, next) = grid.split_buffers();
        let tiles = self.split_tiles(next);

        let mut outcomes: Vec<Option<Result<(), WorkerFailure>>> =
            (0..tiles.len()).map(|_| None).collect();

        // Fork every worker, then join at the end of the scope
        self.pool.scope(|scope| {
            for (tile, outcome) in tiles.into_iter().zip(outcomes.iter_mut()) {
                scope.spawn(move |_| {
                    let index = tile.index;
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        compute_tile(current, tile, rule)
                    }));
                    *outcome = Some(match result {
                        Ok(done) => done,
                        Err(payload) => Err(WorkerFailure::Panicked {
                            index,
                            message: panic_message(payload.as_ref()),
                        }),
                    });
                });
            }
        });

        let failures: Vec<WorkerFailure> = outcomes
            .into_iter()
            .enumerate()
            .filter_map(|(index, outcome)| match outcome {
                Some(Ok(())) => None,
                Some(Err(failure)) => Some(failure),
                None => Some(WorkerFailure::Panicked {
                    index,
                    message: "worker did not report".to_string(),
                }),
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            for failure in &failures {
                log::warn!("{}", failure);
            }
            Err(StepError::Workers {
                workers: self.partition.len(),
                failures,
            })
        }
    }

    /// Carve `next` into one disjoint writer per subregion.
    fn split_tiles<'a>(&self, next: &'a mut [bool]) -> Vec<TileWriter<'a>> {
        let size = self.partition.board_size();
        let side = self.partition.side();
        let factor = self.partition.factor();

        let mut tiles: Vec<TileWriter<'a>> = self
            .partition
            .iter()
            .enumerate()
            .map(|(index, region)| TileWriter {
                index,
                region: *region,
                rows: Vec::with_capacity(side),
            })
            .collect();

        for (row, row_cells) in next.chunks_mut(size).enumerate() {
            let band = row / side;
            for (block, segment) in row_cells.chunks_mut(side).enumerate() {
                tiles[band * factor + block].rows.push(segment);
            }
        }

        tiles
    }
}

/// Worker body: evaluate the rule for every cell of one subregion.
fn compute_tile(
    current: GridView<'_>,
    tile: TileWriter<'_>,
    rule: CellRule,
) -> Result<(), WorkerFailure> {
    let TileWriter {
        index,
        region,
        rows,
    } = tile;

    let fits = region.end_row <= current.size()
        && region.end_col <= current.size()
        && rows.len() == region.height()
        && rows.iter().all(|segment| segment.len() == region.width());
    if !fits {
        return Err(WorkerFailure::Bounds { index, region });
    }

    for (row, segment) in (region.start_row..region.end_row).zip(rows) {
        for (col, cell) in (region.start_col..region.end_col).zip(segment.iter_mut()) {
            *cell = rule(current.get(row, col), current.live_neighbor_count(row, col));
        }
    }

    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stepper(board_size: usize, factor: usize) -> GenerationStepper {
        GenerationStepper::new(Partition::new(board_size, factor).unwrap()).unwrap()
    }

    /// Single-threaded reference using the grid's own API.
    fn sequential_step(grid: &mut Grid) {
        let size = grid.size();
        for row in 0..size {
            for col in 0..size {
                let alive = next_state(grid.get(row, col), grid.live_neighbor_count(row, col));
                grid.set_next(row, col, alive);
            }
        }
        grid.swap();
    }

    fn random_grid(size: usize, bits: &[bool]) -> Grid {
        let mut grid = Grid::new(size);
        for (i, &alive) in bits.iter().take(size * size).enumerate() {
            grid.set(i / size, i % size, alive);
        }
        grid
    }

    #[test]
    fn test_step_does_not_swap() {
        let mut grid = Grid::from_live_cells(4, [(1, 0), (1, 1), (1, 2)]);
        let before = grid.clone();
        let stepper = stepper(4, 2);
        assert_eq!(stepper.workers(), 4);
        assert_eq!(stepper.partition().side(), 2);
        stepper.step(&mut grid).unwrap();
        assert_eq!(grid, before);

        grid.swap();
        assert_eq!(grid, Grid::from_live_cells(4, [(0, 1), (1, 1), (2, 1)]));
    }

    #[test]
    fn test_block_is_still_life() {
        let stepper = stepper(8, 4);
        let block = Grid::from_live_cells(8, [(3, 3), (3, 4), (4, 3), (4, 4)]);
        let mut grid = block.clone();
        for _ in 0..10 {
            stepper.step(&mut grid).unwrap();
            grid.swap();
            assert_eq!(grid, block);
        }
    }

    #[test]
    fn test_block_across_seam_is_still_life() {
        // straddles both torus seams and all four corner subregions
        let stepper = stepper(6, 3);
        let block = Grid::from_live_cells(6, [(5, 5), (5, 0), (0, 5), (0, 0)]);
        let mut grid = block.clone();
        for _ in 0..5 {
            stepper.step(&mut grid).unwrap();
            grid.swap();
        }
        assert_eq!(grid, block);
    }

    #[test]
    fn test_blinker_period_two() {
        let stepper = stepper(6, 2);
        let horizontal = Grid::from_live_cells(6, [(2, 1), (2, 2), (2, 3)]);
        let vertical = Grid::from_live_cells(6, [(1, 2), (2, 2), (3, 2)]);
        let mut grid = horizontal.clone();
        for generation in 1..=4 {
            stepper.step(&mut grid).unwrap();
            grid.swap();
            let expected = if generation % 2 == 1 { &vertical } else { &horizontal };
            assert_eq!(&grid, expected, "generation {}", generation);
        }
    }

    #[test]
    fn test_blinker_on_edge_wraps() {
        let stepper = stepper(4, 2);
        let mut grid = Grid::from_live_cells(4, [(0, 3), (0, 0), (0, 1)]);
        stepper.step(&mut grid).unwrap();
        grid.swap();
        assert_eq!(grid, Grid::from_live_cells(4, [(3, 0), (0, 0), (1, 0)]));
    }

    #[test]
    fn test_mismatched_grid_rejected() {
        let stepper = stepper(8, 2);
        let mut grid = Grid::from_live_cells(4, [(0, 0)]);
        let before = grid.clone();
        let err = stepper.step(&mut grid).unwrap_err();
        assert!(matches!(
            err,
            StepError::PartitionBounds {
                expected: 8,
                actual: 4
            }
        ));
        assert_eq!(grid, before);
    }

    fn panicking_rule(alive: bool, neighbors: u8) -> bool {
        if neighbors == 3 {
            panic!("rule refused 3 neighbors");
        }
        next_state(alive, neighbors)
    }

    #[test]
    fn test_worker_failures_are_aggregated() {
        let stepper = stepper(8, 2).with_rule(panicking_rule);
        // two separate blinkers put births in subregions 0 and 3 only
        let mut grid = Grid::from_live_cells(8, [(1, 0), (1, 1), (1, 2), (5, 5), (5, 6), (5, 7)]);

        match stepper.step(&mut grid) {
            Err(StepError::Workers { workers, failures }) => {
                assert_eq!(workers, 4);
                let mut indices: Vec<usize> = failures.iter().map(WorkerFailure::index).collect();
                indices.sort_unstable();
                assert_eq!(indices, vec![0, 3]);
                assert!(failures.iter().all(|f| matches!(
                    f,
                    WorkerFailure::Panicked { message, .. } if message.contains("3 neighbors")
                )));
            }
            other => panic!("expected aggregated worker failure, got {:?}", other),
        }
    }

    #[test]
    fn test_workers_error_message() {
        let error = StepError::Workers {
            workers: 4,
            failures: vec![WorkerFailure::Panicked {
                index: 2,
                message: "boom".to_string(),
            }],
        };
        assert_eq!(error.to_string(), "1 of 4 workers failed; first: worker 2 panicked: boom");

        let empty = StepError::Workers {
            workers: 4,
            failures: Vec::new(),
        };
        assert_eq!(empty.to_string(), "0 of 4 workers failed; first: none");
    }

    #[test]
    fn test_worker_bounds_check() {
        let grid = Grid::new(4);
        let view = grid.view();
        let mut row = vec![false; 2];
        let tile = TileWriter {
            index: 7,
            region: Subregion {
                start_row: 0,
                end_row: 2,
                start_col: 0,
                end_col: 2,
            },
            rows: vec![&mut row[..]],
        };
        assert!(matches!(
            compute_tile(view, tile, next_state),
            Err(WorkerFailure::Bounds { index: 7, .. })
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_parallel_matches_sequential(bits in proptest::collection::vec(any::<bool>(), 64)) {
            let seed = random_grid(8, &bits);

            let mut reference = seed.clone();
            sequential_step(&mut reference);

            for factor in [1, 2, 4] {
                let mut grid = seed.clone();
                stepper(8, factor).step(&mut grid).unwrap();
                grid.swap();
                prop_assert_eq!(&grid, &reference);
            }
        }
    }
}
