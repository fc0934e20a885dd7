//! Square tiling of the board into per-worker subregions.

use std::fmt;

use crate::schema::ConfigError;

/// Half-open rectangular bounds `[start_row, end_row) x [start_col, end_col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subregion {
    pub start_row: usize,
    pub end_row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl Subregion {
    /// Number of rows covered.
    #[inline]
    pub fn height(&self) -> usize {
        self.end_row - self.start_row
    }

    /// Number of columns covered.
    #[inline]
    pub fn width(&self) -> usize {
        self.end_col - self.start_col
    }

    /// Whether `(row, col)` lies inside these bounds.
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.start_row..self.end_row).contains(&row)
            && (self.start_col..self.end_col).contains(&col)
    }

    /// Every `(row, col)` inside the bounds, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.start_col..self.end_col;
        (self.start_row..self.end_row)
            .flat_map(move |row| cols.clone().map(move |col| (row, col)))
    }
}

impl fmt::Display for Subregion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{}) x [{}..{})",
            self.start_row, self.end_row, self.start_col, self.end_col
        )
    }
}

/// The N x N subregions of an M x M board, in row-major order.
///
/// Subregion `band * factor + column_block` covers rows
/// `band * side..(band + 1) * side` and the matching column block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    board_size: usize,
    factor: usize,
    side: usize,
    subregions: Vec<Subregion>,
}

impl Partition {
    /// Split a `board_size` board into `factor` x `factor` equal squares.
    pub fn new(board_size: usize, factor: usize) -> Result<Self, ConfigError> {
        if board_size == 0 {
            return Err(ConfigError::ZeroBoardSize);
        }
        if factor == 0 {
            return Err(ConfigError::ZeroPartitions);
        }
        if board_size % factor != 0 {
            return Err(ConfigError::IndivisibleBoard {
                board_size,
                partitions: factor,
            });
        }

        let side = board_size / factor;
        let subregions = (0..factor)
            .flat_map(|band| {
                (0..factor).map(move |block| Subregion {
                    start_row: band * side,
                    end_row: (band + 1) * side,
                    start_col: block * side,
                    end_col: (block + 1) * side,
                })
            })
            .collect();

        Ok(Self {
            board_size,
            factor,
            side,
            subregions,
        })
    }

    /// Side length of the board being tiled (M).
    #[inline]
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Subregions per axis (N).
    #[inline]
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Side length of each subregion (M / N).
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of subregions (N * N).
    #[inline]
    pub fn len(&self) -> usize {
        self.subregions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subregions.is_empty()
    }

    pub fn subregions(&self) -> &[Subregion] {
        &self.subregions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subregion> {
        self.subregions.iter()
    }

    /// Index of the subregion owning `(row, col)`.
    pub fn owner_of(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.board_size || col >= self.board_size {
            return None;
        }
        Some((row / self.side) * self.factor + col / self.side)
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Subregion;
    type IntoIter = std::slice::Iter<'a, Subregion>;

    fn into_iter(self) -> Self::IntoIter {
        self.subregions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_partition_covers_board() {
        let partition = Partition::new(6, 1).unwrap();
        assert_eq!(partition.len(), 1);
        assert_eq!(
            partition.subregions()[0],
            Subregion {
                start_row: 0,
                end_row: 6,
                start_col: 0,
                end_col: 6,
            }
        );
    }

    #[test]
    fn test_row_major_order() {
        let partition = Partition::new(8, 2).unwrap();
        let starts: Vec<(usize, usize)> = partition
            .iter()
            .map(|r| (r.start_row, r.start_col))
            .collect();
        assert_eq!(starts, vec![(0, 0), (0, 4), (4, 0), (4, 4)]);
        assert_eq!(partition.side(), 4);
    }

    #[test]
    fn test_indivisible_board_rejected() {
        assert!(matches!(
            Partition::new(10, 3),
            Err(ConfigError::IndivisibleBoard {
                board_size: 10,
                partitions: 3
            })
        ));
    }

    #[test]
    fn test_zero_sizes_rejected() {
        assert!(matches!(Partition::new(0, 1), Err(ConfigError::ZeroBoardSize)));
        assert!(matches!(Partition::new(4, 0), Err(ConfigError::ZeroPartitions)));
    }

    #[test]
    fn test_owner_of() {
        let partition = Partition::new(9, 3).unwrap();
        assert_eq!(partition.owner_of(0, 0), Some(0));
        assert_eq!(partition.owner_of(4, 7), Some(5));
        assert_eq!(partition.owner_of(8, 8), Some(8));
        assert_eq!(partition.owner_of(9, 0), None);
    }

    proptest! {
        #[test]
        fn prop_subregions_tile_board(factor in 1usize..7, side in 1usize..7) {
            let board_size = factor * side;
            let partition = Partition::new(board_size, factor).unwrap();
            prop_assert_eq!(partition.len(), factor * factor);

            let mut hits = vec![0u32; board_size * board_size];
            for (index, region) in partition.iter().enumerate() {
                prop_assert_eq!(region.height(), side);
                prop_assert_eq!(region.width(), side);
                for (row, col) in region.cells() {
                    prop_assert!(row < board_size && col < board_size);
                    prop_assert!(region.contains(row, col));
                    prop_assert_eq!(partition.owner_of(row, col), Some(index));
                    hits[row * board_size + col] += 1;
                }
            }
            // no gaps, no overlap
            prop_assert!(hits.iter().all(|&h| h == 1));
        }
    }
}
