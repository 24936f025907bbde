//! Thresholded local-maximum scan over per-level score grids.

use crate::grid::{LevelScores, ScoreGrid};

/// A grid cell accepted as a local maximum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalMaximum {
    /// Pyramid level index.
    pub level: usize,
    /// Row in the level's score grid.
    pub y: usize,
    /// Column in the level's score grid.
    pub x: usize,
    /// Score at the cell.
    pub score: f32,
    /// Mixture component that produced the score.
    pub component: usize,
}

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// True when `(y, x)` scores at least as high as every existing neighbour.
///
/// Neighbours outside the grid are ignored, so border cells are never
/// rejected for lacking one. Equal neighbours do not reject a cell.
pub fn is_local_maximum(grid: &ScoreGrid, y: usize, x: usize) -> bool {
    let Some(&score) = grid.get(y, x) else {
        return false;
    };
    NEIGHBOURS.iter().all(|&(dy, dx)| {
        let (Some(ny), Some(nx)) = (y.checked_add_signed(dy), x.checked_add_signed(dx)) else {
            return true;
        };
        match grid.get(ny, nx) {
            Some(&neighbour) => score >= neighbour,
            None => true,
        }
    })
}

/// Appends the local maxima of one level scoring strictly above `threshold`.
///
/// Cells are visited row by row, so `out` receives them in discovery order.
pub fn scan_level(level: usize, scores: &LevelScores, threshold: f32, out: &mut Vec<LocalMaximum>) {
    let grid = scores.scores();
    for y in 0..grid.rows() {
        let row = grid.row(y).expect("row within grid");
        for (x, &score) in row.iter().enumerate() {
            if score > threshold && is_local_maximum(grid, y, x) {
                let Some(&component) = scores.components().get(y, x) else {
                    continue;
                };
                out.push(LocalMaximum {
                    level,
                    y,
                    x,
                    score,
                    component,
                });
            }
        }
    }
}

/// Scans every level in order and returns all accepted local maxima.
pub fn scan_levels(levels: &[LevelScores], threshold: f32) -> Vec<LocalMaximum> {
    let mut out = Vec::new();
    for (level, scores) in levels.iter().enumerate() {
        scan_level(level, scores, threshold, &mut out);
    }
    out
}
