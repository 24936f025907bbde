//! dpmdetect turns multi-scale mixture-model scores into final detections.
//!
//! An image is bounded to a maximum size, scored over a feature pyramid by a
//! mixture of root filters, scanned for thresholded local maxima, mapped back
//! to pixel rectangles, and cleaned up with greedy overlap suppression.
//! Batches run in parallel across images with the `rayon` feature.

mod bank;
mod candidate;
pub mod detector;
pub mod feature;
pub mod grid;
pub mod image;
mod kernel;
pub mod lowlevel;
pub mod model;
mod search;
mod trace;
pub mod util;

pub use crate::candidate::detection::{Detection, Rect};
pub use crate::candidate::nms::{Intersector, OverlapMetric, OverlapPredicate};
pub use crate::detector::{Detect, Detector, DetectorConfig};
pub use crate::feature::plan::TransformPlan;
pub use crate::feature::pyramid::FeaturePyramid;
pub use crate::grid::{ComponentIndexGrid, Grid, LevelScores, ScoreGrid};
pub use crate::image::{RgbImage, RgbView};
pub use crate::model::{Mixture, MixtureModel, RootFilter};
pub use crate::search::map::{PyramidGeometry, RootSize};
pub use crate::util::{DetectError, DetectResult};

#[cfg(feature = "image-io")]
pub use crate::image::io;
