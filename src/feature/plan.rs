//! Scale-dependent transform state, sized once for the largest image.

use crate::util::math::level_resample_factor;
use crate::util::{DetectError, DetectResult};

use super::CELL_SIZE;
use crate::image::CHANNELS;

/// Precomputed per-level resample factors for one image bound.
///
/// Built once per detector and shared read-only by every worker. Levels are
/// laid out for the bound rounded up to a multiple of 16 pixels.
#[derive(Clone, Debug)]
pub struct TransformPlan {
    max_image_size: usize,
    aligned_size: usize,
    padding: usize,
    interval: usize,
    levels: Vec<LevelPlan>,
}

/// Constants for one pyramid level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelPlan {
    /// Factor applied to the image before cell binning.
    pub factor: f64,
}

impl TransformPlan {
    /// Builds the plan for images no larger than `max_image_size` on either side.
    pub fn new(max_image_size: usize, padding: usize, interval: usize) -> DetectResult<Self> {
        if max_image_size == 0 {
            return Err(DetectError::TransformPlan {
                reason: "max image size must be > 0",
            });
        }
        if interval == 0 {
            return Err(DetectError::TransformPlan {
                reason: "interval must be > 0",
            });
        }
        let aligned_size = max_image_size
            .checked_add(15)
            .map(|v| v & !15)
            .ok_or(DetectError::TransformPlan {
                reason: "image bound overflows",
            })?;
        // The first octave is upsampled by two; its buffer must be addressable.
        aligned_size
            .checked_mul(2)
            .and_then(|side| side.checked_mul(side))
            .and_then(|px| px.checked_mul(CHANNELS))
            .ok_or(DetectError::TransformPlan {
                reason: "upsampled level does not fit in memory",
            })?;
        if padding.checked_mul(2).is_none() {
            return Err(DetectError::TransformPlan {
                reason: "padding overflows",
            });
        }

        let mut levels = Vec::new();
        for level in 0.. {
            let factor = level_resample_factor(level, interval);
            let cells = (aligned_size as f64 * factor).round() as usize / CELL_SIZE;
            if cells == 0 {
                break;
            }
            levels.push(LevelPlan { factor });
        }

        Ok(Self {
            max_image_size,
            aligned_size,
            padding,
            interval,
            levels,
        })
    }

    /// Largest supported image side.
    pub fn max_image_size(&self) -> usize {
        self.max_image_size
    }

    /// Image bound rounded up to a multiple of 16.
    pub fn aligned_size(&self) -> usize {
        self.aligned_size
    }

    /// Zero-padding cells around every level.
    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Levels per octave.
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Per-level constants, finest level first.
    pub fn levels(&self) -> &[LevelPlan] {
        &self.levels
    }
}
