//! Detector configuration.

use std::path::PathBuf;

use crate::candidate::nms::OverlapMetric;
use crate::util::{DetectError, DetectResult};

/// Options fixed at detector construction.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Path to the serialised mixture model.
    pub model_file: PathBuf,
    /// Minimum score for a cell to become a candidate (exclusive).
    pub threshold: f32,
    /// Overlap above which the weaker of two detections is suppressed.
    pub overlap: f32,
    /// Zero-padding cells around each pyramid level.
    pub padding: usize,
    /// Pyramid levels per octave.
    pub interval: usize,
    /// Images are shrunk so neither side exceeds this many pixels.
    pub max_image_size: usize,
    /// Overlap metric used during suppression.
    pub overlap_metric: OverlapMetric,
    /// Process batch images on the rayon pool when the feature is enabled.
    pub parallel: bool,
    /// Report rectangles in the caller's image coordinates rather than in the
    /// coordinates of the bounded image.
    pub report_input_coords: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_file: PathBuf::new(),
            threshold: 0.3,
            overlap: 0.2,
            padding: 6,
            interval: 5,
            max_image_size: 1000,
            overlap_metric: OverlapMetric::CandidateArea,
            parallel: true,
            report_input_coords: false,
        }
    }
}

impl DetectorConfig {
    /// Checks value ranges.
    pub fn validate(&self) -> DetectResult<()> {
        if !self.threshold.is_finite() {
            return Err(DetectError::InvalidConfig {
                reason: "threshold must be finite",
            });
        }
        if !(self.overlap > 0.0 && self.overlap < 1.0) {
            return Err(DetectError::InvalidConfig {
                reason: "overlap must be in (0, 1)",
            });
        }
        if self.padding < 2 {
            return Err(DetectError::InvalidConfig {
                reason: "padding must be >= 2",
            });
        }
        if self.interval == 0 {
            return Err(DetectError::InvalidConfig {
                reason: "interval must be > 0",
            });
        }
        if self.max_image_size == 0 {
            return Err(DetectError::InvalidConfig {
                reason: "max_image_size must be > 0",
            });
        }
        Ok(())
    }
}
