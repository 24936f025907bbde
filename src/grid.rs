//! Dense row-major grids for per-level scores and winning components.
//!
//! Unlike image views, grids may be empty: a pyramid level smaller than a
//! root filter produces a `0 x 0` response, which downstream stages treat as
//! "no candidates" rather than an error.

use crate::util::{DetectError, DetectResult};

/// Owned row-major grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

/// Scores for one pyramid level.
pub type ScoreGrid = Grid<f32>;

/// Winning mixture component per cell, parallel to a [`ScoreGrid`].
pub type ComponentIndexGrid = Grid<usize>;

impl<T> Grid<T> {
    /// Wraps a buffer of exactly `rows * cols` elements.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> DetectResult<Self> {
        let needed = rows
            .checked_mul(cols)
            .ok_or(DetectError::InvalidDimensions {
                width: cols,
                height: rows,
            })?;
        if data.len() < needed {
            return Err(DetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(DetectError::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Returns an empty `0 x 0` grid.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols: 0,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Returns the element at row `y`, column `x`.
    pub fn get(&self, y: usize, x: usize) -> Option<&T> {
        if y >= self.rows || x >= self.cols {
            return None;
        }
        self.data.get(y * self.cols + x)
    }

    /// Returns row `y` as a slice.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.rows {
            return None;
        }
        let start = y * self.cols;
        self.data.get(start..start + self.cols)
    }

    /// Returns the backing buffer in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Copies the top-left `rows x cols` block.
    pub(crate) fn cropped(&self, rows: usize, cols: usize) -> Self {
        let rows = rows.min(self.rows);
        let cols = cols.min(self.cols);
        let mut data = Vec::with_capacity(rows * cols);
        for y in 0..rows {
            let start = y * self.cols;
            data.extend_from_slice(&self.data[start..start + cols]);
        }
        Self { data, rows, cols }
    }
}

impl<T> Grid<T> {
    pub(crate) fn get_mut(&mut self, y: usize, x: usize) -> Option<&mut T> {
        if y >= self.rows || x >= self.cols {
            return None;
        }
        self.data.get_mut(y * self.cols + x)
    }
}

/// Score and winning-component grids for one pyramid level.
///
/// Both grids always have the same shape.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelScores {
    scores: ScoreGrid,
    components: ComponentIndexGrid,
}

impl LevelScores {
    /// Pairs a score grid with its component grid; shapes must agree.
    pub fn new(scores: ScoreGrid, components: ComponentIndexGrid) -> DetectResult<Self> {
        if scores.rows() != components.rows() || scores.cols() != components.cols() {
            return Err(DetectError::InvalidDimensions {
                width: components.cols(),
                height: components.rows(),
            });
        }
        Ok(Self { scores, components })
    }

    pub(crate) fn paired(scores: ScoreGrid, components: ComponentIndexGrid) -> Self {
        debug_assert_eq!(
            (scores.rows(), scores.cols()),
            (components.rows(), components.cols())
        );
        Self { scores, components }
    }

    /// A level with no cells.
    pub fn empty() -> Self {
        Self {
            scores: Grid::empty(),
            components: Grid::empty(),
        }
    }

    /// Convenience for single-component models: every cell is component 0.
    pub fn single_component(scores: ScoreGrid) -> Self {
        let components = Grid::filled(scores.rows(), scores.cols(), 0);
        Self { scores, components }
    }

    /// Best score per cell.
    pub fn scores(&self) -> &ScoreGrid {
        &self.scores
    }

    /// Index of the component that produced each score.
    pub fn components(&self) -> &ComponentIndexGrid {
        &self.components
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, LevelScores};
    use crate::util::DetectError;

    #[test]
    fn from_vec_checks_length() {
        assert!(Grid::from_vec(vec![0.0f32; 6], 2, 3).is_ok());
        assert_eq!(
            Grid::from_vec(vec![0.0f32; 5], 2, 3).err(),
            Some(DetectError::BufferTooSmall { needed: 6, got: 5 })
        );
        assert!(Grid::from_vec(vec![0.0f32; 7], 2, 3).is_err());
    }

    #[test]
    fn empty_grids_are_allowed() {
        let grid = Grid::<f32>::from_vec(Vec::new(), 0, 4).unwrap();
        assert!(grid.is_empty());
        assert!(grid.get(0, 0).is_none());
    }

    #[test]
    fn cropped_keeps_top_left_block() {
        let grid = Grid::from_vec((0..12).collect::<Vec<i32>>(), 3, 4).unwrap();
        let crop = grid.cropped(2, 2);
        assert_eq!(crop.as_slice(), &[0, 1, 4, 5]);
    }

    #[test]
    fn level_scores_reject_mismatched_shapes() {
        let scores = Grid::filled(2, 2, 0.0f32);
        let components = Grid::filled(2, 3, 0usize);
        assert_eq!(
            LevelScores::new(scores, components).err(),
            Some(DetectError::InvalidDimensions {
                width: 3,
                height: 2
            })
        );
    }
}
