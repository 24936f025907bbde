//! Back-projection of grid cells into image pixel rectangles.

use crate::candidate::detection::{Detection, Rect};
use crate::search::scan::LocalMaximum;
use crate::util::math::{level_scale, round_half_up};

/// Root-filter footprint of one mixture component, in feature cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RootSize {
    pub rows: usize,
    pub cols: usize,
}

/// Per-image pyramid constants needed to map cells back to pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PyramidGeometry {
    /// Zero-padding cells on the left and right of every level.
    pub padding_x: usize,
    /// Zero-padding cells above and below every level.
    pub padding_y: usize,
    /// Levels per octave.
    pub interval: usize,
}

impl PyramidGeometry {
    /// Pixels per feature cell at `level`.
    pub fn scale(&self, level: usize) -> f64 {
        level_scale(level, self.interval)
    }
}

/// Maps a local maximum to a detection clipped to a `width x height` image.
///
/// Returns `None` when the clipped rectangle has no area or when the
/// component has no entry in `sizes`.
pub fn map_to_image(
    cell: &LocalMaximum,
    geometry: &PyramidGeometry,
    sizes: &[RootSize],
    width: usize,
    height: usize,
) -> Option<Detection> {
    let size = sizes.get(cell.component)?;
    let scale = geometry.scale(cell.level);

    let x = round_half_up((cell.x as f64 - geometry.padding_x as f64) * scale).max(0);
    let y = round_half_up((cell.y as f64 - geometry.padding_y as f64) * scale).max(0);
    let w = round_half_up(size.cols as f64 * scale).min(width as i64 - x);
    let h = round_half_up(size.rows as f64 * scale).min(height as i64 - y);
    if w <= 0 || h <= 0 {
        return None;
    }

    let rect = Rect::new(
        i32::try_from(x).ok()?,
        i32::try_from(y).ok()?,
        i32::try_from(w).ok()?,
        i32::try_from(h).ok()?,
    );
    Some(Detection::new(cell.score, rect))
}

/// Maps every local maximum, silently dropping degenerate rectangles.
pub fn map_all(
    cells: &[LocalMaximum],
    geometry: &PyramidGeometry,
    sizes: &[RootSize],
    width: usize,
    height: usize,
) -> Vec<Detection> {
    cells
        .iter()
        .filter_map(|cell| map_to_image(cell, geometry, sizes, width, height))
        .collect()
}
