//! Spatial cross-correlation of root filters over feature maps.

use crate::bank::FilterPlan;
use crate::feature::FeatureMap;
use crate::grid::ScoreGrid;

/// Scores every placement of `filter` fully inside `map`.
///
/// Cell `(y, x)` of the result holds `bias + <filter, map window at (y, x)>`,
/// with the window's top-left corner at padded cell `(y, x)`. A map smaller
/// than the filter in either direction yields an empty grid.
pub fn correlate(map: &FeatureMap, filter: &FilterPlan) -> ScoreGrid {
    if map.rows() < filter.rows() || map.cols() < filter.cols() {
        return ScoreGrid::empty();
    }
    let out_rows = map.rows() - filter.rows() + 1;
    let out_cols = map.cols() - filter.cols() + 1;
    let mut scores = Vec::with_capacity(out_rows * out_cols);

    for y in 0..out_rows {
        for x in 0..out_cols {
            let mut acc = 0.0f32;
            for fy in 0..filter.rows() {
                let window = map.run(y + fy, x, filter.cols());
                acc += dot(window, filter.row(fy));
            }
            scores.push(filter.bias() + acc);
        }
    }

    ScoreGrid::from_vec(scores, out_rows, out_cols).expect("correlation output is dense")
}

#[inline]
fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
