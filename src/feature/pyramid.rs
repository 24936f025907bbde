//! Multi-scale feature pyramid over an RGB image.
//!
//! Level `z` resamples the image by `2^(1 - z/interval)` and bins it into
//! `CELL_SIZE` cells, so the first octave is computed on a 2x upsampled image
//! and one cell at level `z` covers `2^(z/interval + 2)` input pixels. The
//! coordinate mapper relies on exactly this layout.

use crate::feature::plan::TransformPlan;
use crate::feature::{compute_features, FeatureMap, CELL_SIZE};
use crate::image::resize::resize_bilinear;
use crate::image::{scaled_dim, RgbView};
use crate::search::map::PyramidGeometry;
use crate::trace::trace_event;

/// Feature maps for every level of one image, finest first.
#[derive(Clone, Debug)]
pub struct FeaturePyramid {
    levels: Vec<FeatureMap>,
    padding: usize,
    interval: usize,
}

impl FeaturePyramid {
    /// Builds the pyramid for `image` using the levels laid out in `plan`.
    ///
    /// Stops at the first level whose resampled image no longer holds a full
    /// cell in both directions. An image too small for any level yields an
    /// empty pyramid.
    pub fn build(image: RgbView<'_>, plan: &TransformPlan) -> Self {
        let padding = plan.padding();
        let mut levels = Vec::with_capacity(plan.levels().len());
        for level in plan.levels() {
            let width = scaled_dim(image.width(), level.factor);
            let height = scaled_dim(image.height(), level.factor);
            if width < CELL_SIZE || height < CELL_SIZE {
                break;
            }
            let map = if width == image.width() && height == image.height() {
                compute_features(image, padding)
            } else {
                let resampled = resize_bilinear(image, width, height);
                compute_features(resampled.view(), padding)
            };
            levels.push(map);
        }
        trace_event!("feature_pyramid", levels = levels.len());
        Self {
            levels,
            padding,
            interval: plan.interval(),
        }
    }

    /// Wraps precomputed feature maps.
    pub fn from_levels(levels: Vec<FeatureMap>, padding: usize, interval: usize) -> Self {
        Self {
            levels,
            padding,
            interval,
        }
    }

    /// All levels, finest first.
    pub fn levels(&self) -> &[FeatureMap] {
        &self.levels
    }

    /// Number of levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Constants needed to map level cells back to pixels.
    pub fn geometry(&self) -> PyramidGeometry {
        PyramidGeometry {
            padding_x: self.padding,
            padding_y: self.padding,
            interval: self.interval,
        }
    }
}
