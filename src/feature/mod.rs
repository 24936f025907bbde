//! Gradient-orientation cell features and the multi-scale feature pyramid.
//!
//! Every cell of `CELL_SIZE x CELL_SIZE` pixels is summarised by
//! `FEATURE_DIM` values: `ORIENTATIONS` unsigned orientation bins followed by
//! one gradient-energy channel. Feature maps are stored row-major with the
//! feature index varying fastest, so a run of `w` adjacent cells is one
//! contiguous slice of `w * FEATURE_DIM` values.

use crate::image::{RgbView, CHANNELS};
use std::f32::consts::PI;

pub mod plan;
pub mod pyramid;

/// Pixels per cell side.
pub const CELL_SIZE: usize = 8;
/// Unsigned orientation bins over `[0, pi)`.
pub const ORIENTATIONS: usize = 9;
/// Values stored per cell.
pub const FEATURE_DIM: usize = ORIENTATIONS + 1;

const TRUNCATION: f32 = 0.2;

/// Dense grid of per-cell feature vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMap {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl FeatureMap {
    /// Creates an all-zero map.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols * FEATURE_DIM],
        }
    }

    /// Number of cell rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cell columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Feature vector of cell `(y, x)`.
    pub fn cell(&self, y: usize, x: usize) -> Option<&[f32]> {
        if y >= self.rows || x >= self.cols {
            return None;
        }
        let start = (y * self.cols + x) * FEATURE_DIM;
        self.data.get(start..start + FEATURE_DIM)
    }

    /// Features of `len` adjacent cells starting at `(y, x)`.
    pub(crate) fn run(&self, y: usize, x: usize, len: usize) -> &[f32] {
        let start = (y * self.cols + x) * FEATURE_DIM;
        &self.data[start..start + len * FEATURE_DIM]
    }

    fn cell_mut(&mut self, y: usize, x: usize) -> &mut [f32] {
        let start = (y * self.cols + x) * FEATURE_DIM;
        &mut self.data[start..start + FEATURE_DIM]
    }
}

/// Computes cell features for `image`, surrounded by `padding` zero cells.
///
/// Only whole cells are kept; trailing pixels that do not fill a cell are
/// ignored. Gradients use central differences with clamped borders, taking
/// the colour channel with the strongest response at each pixel.
pub fn compute_features(image: RgbView<'_>, padding: usize) -> FeatureMap {
    let cells_x = image.width() / CELL_SIZE;
    let cells_y = image.height() / CELL_SIZE;
    let mut map = FeatureMap::zeros(cells_y + 2 * padding, cells_x + 2 * padding);
    if cells_x == 0 || cells_y == 0 {
        return map;
    }

    let mut hist = vec![[0.0f32; ORIENTATIONS]; cells_x * cells_y];
    let mut energy = vec![0.0f32; cells_x * cells_y];
    let last_x = image.width() - 1;
    let last_y = image.height() - 1;
    let bin_width = PI / ORIENTATIONS as f32;

    for y in 0..cells_y * CELL_SIZE {
        let above = image.row(y.saturating_sub(1)).expect("row in bounds");
        let below = image.row((y + 1).min(last_y)).expect("row in bounds");
        let here = image.row(y).expect("row in bounds");
        let cy = y / CELL_SIZE;

        for x in 0..cells_x * CELL_SIZE {
            let left = x.saturating_sub(1) * CHANNELS;
            let right = (x + 1).min(last_x) * CHANNELS;
            let centre = x * CHANNELS;

            let mut best = (0.0f32, 0.0f32, 0.0f32);
            for c in 0..CHANNELS {
                let dx = here[right + c] as f32 - here[left + c] as f32;
                let dy = below[centre + c] as f32 - above[centre + c] as f32;
                let mag2 = dx * dx + dy * dy;
                if mag2 > best.2 {
                    best = (dx, dy, mag2);
                }
            }
            let (dx, dy, mag2) = best;
            if mag2 == 0.0 {
                continue;
            }

            let mut angle = dy.atan2(dx);
            if angle < 0.0 {
                angle += PI;
            }
            if angle >= PI {
                angle -= PI;
            }
            let bin = ((angle / bin_width) as usize).min(ORIENTATIONS - 1);
            let idx = cy * cells_x + x / CELL_SIZE;
            let mag = mag2.sqrt();
            hist[idx][bin] += mag;
            energy[idx] += mag;
        }
    }

    let pixels_per_cell = (CELL_SIZE * CELL_SIZE) as f32;
    for cy in 0..cells_y {
        for cx in 0..cells_x {
            let idx = cy * cells_x + cx;
            let out = map.cell_mut(cy + padding, cx + padding);
            normalize_cell(&hist[idx], &mut out[..ORIENTATIONS]);
            out[ORIENTATIONS] = (energy[idx] / pixels_per_cell / 255.0).min(1.0);
        }
    }
    map
}

/// L2-normalises a histogram, truncates large bins, and renormalises.
fn normalize_cell(hist: &[f32; ORIENTATIONS], out: &mut [f32]) {
    let norm = hist.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm <= f32::EPSILON {
        return;
    }
    for (dst, &v) in out.iter_mut().zip(hist.iter()) {
        *dst = (v / norm).min(TRUNCATION);
    }
    let norm = out.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in out.iter_mut() {
            *v /= norm;
        }
    }
}
