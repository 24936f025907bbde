//! Batch detection: bounding, scoring, scanning, mapping and suppression.
//!
//! A [`Detector`] is built once from a [`DetectorConfig`]; construction loads
//! the model, caches its filters and sizes the transform plan, and fails if
//! any of that goes wrong. Afterwards the detector is read-only and each
//! image runs through the pipeline independently:
//!
//! 1. shrink the image to the configured bound,
//! 2. build the feature pyramid and score it with the model,
//! 3. keep thresholded local maxima of every level,
//! 4. map them to clipped pixel rectangles,
//! 5. greedily suppress overlapping detections.

mod config;

pub use config::DetectorConfig;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::candidate::detection::{Detection, Rect};
use crate::candidate::nms::{suppress_overlaps, OverlapPredicate};
use crate::feature::plan::TransformPlan;
use crate::feature::pyramid::FeaturePyramid;
use crate::image::bounds::bound_image;
use crate::image::RgbView;
use crate::model::{Mixture, MixtureModel};
use crate::search::map::{map_all, RootSize};
use crate::search::scan::scan_levels;
use crate::trace::{trace_event, trace_span};
use crate::util::{DetectError, DetectResult};

/// Anything that turns images into per-image detection lists.
pub trait Detect {
    /// Detects objects in every image; `result[i]` belongs to `images[i]`.
    fn detect_batch(&self, images: &[RgbView<'_>]) -> Vec<Vec<Detection>>;

    /// Detects objects in a single image.
    fn detect(&self, image: RgbView<'_>) -> Vec<Detection> {
        self.detect_batch(std::slice::from_ref(&image))
            .pop()
            .unwrap_or_default()
    }
}

/// Mixture-model detector.
pub struct Detector<M: MixtureModel = Mixture> {
    cfg: DetectorConfig,
    model: M,
    sizes: Vec<RootSize>,
    plan: TransformPlan,
    predicate: Box<dyn OverlapPredicate>,
}

impl Detector<Mixture> {
    /// Loads the model named in `cfg` and prepares the detector.
    pub fn new(cfg: DetectorConfig) -> DetectResult<Self> {
        cfg.validate()?;
        let model = Mixture::load(&cfg.model_file)?;
        Self::with_model(cfg, model)
    }
}

impl<M: MixtureModel> Detector<M> {
    /// Prepares a detector around an already loaded model.
    ///
    /// `cfg.model_file` is ignored.
    pub fn with_model(cfg: DetectorConfig, mut model: M) -> DetectResult<Self> {
        cfg.validate()?;
        let _span = trace_span!("detector_init", max_image_size = cfg.max_image_size).entered();
        if model.is_empty() {
            return Err(DetectError::EmptyModel);
        }

        let plan = TransformPlan::new(cfg.max_image_size, cfg.padding, cfg.interval)?;
        trace_event!(
            "transform_plan",
            aligned_size = plan.aligned_size(),
            levels = plan.levels().len()
        );

        model.cache_filters()?;
        let sizes = model.root_sizes();
        trace_event!("filters_cached", components = sizes.len());

        let predicate: Box<dyn OverlapPredicate> = Box::new(cfg.overlap_metric);
        Ok(Self {
            cfg,
            model,
            sizes,
            plan,
            predicate,
        })
    }

    /// Replaces the overlap predicate used during suppression.
    pub fn with_overlap_predicate<P>(mut self, predicate: P) -> Self
    where
        P: OverlapPredicate + 'static,
    {
        self.predicate = Box::new(predicate);
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Returns the loaded model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns the shared transform plan.
    pub fn plan(&self) -> &TransformPlan {
        &self.plan
    }

    fn detect_image(&self, image: RgbView<'_>) -> Vec<Detection> {
        let _span = trace_span!(
            "detect_image",
            width = image.width(),
            height = image.height()
        )
        .entered();

        let bounded = bound_image(image, self.cfg.max_image_size);
        let view = bounded.view();

        let pyramid = FeaturePyramid::build(view, &self.plan);
        let levels = self.model.convolve(&pyramid);
        let cells = scan_levels(&levels, self.cfg.threshold);
        let mut detections = map_all(
            &cells,
            &pyramid.geometry(),
            &self.sizes,
            view.width(),
            view.height(),
        );
        let candidates = detections.len();
        suppress_overlaps(&mut detections, self.cfg.overlap, self.predicate.as_ref());

        let scale = bounded.scale();
        if self.cfg.report_input_coords && scale < 1.0 {
            detections = detections
                .into_iter()
                .filter_map(|det| restore_input_scale(det, scale, image.width(), image.height()))
                .collect();
        }

        trace_event!("detections", candidates = candidates, kept = detections.len());
        detections
    }
}

impl<M: MixtureModel> Detect for Detector<M> {
    fn detect_batch(&self, images: &[RgbView<'_>]) -> Vec<Vec<Detection>> {
        let _span = trace_span!("detect_batch", images = images.len()).entered();
        let mut slots: Vec<Vec<Detection>> = vec![Vec::new(); images.len()];

        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            slots
                .par_iter_mut()
                .zip(images.par_iter())
                .for_each(|(slot, image)| *slot = self.detect_image(*image));
            return slots;
        }

        for (slot, image) in slots.iter_mut().zip(images) {
            *slot = self.detect_image(*image);
        }
        slots
    }
}

/// Divides a bounded-image rectangle by `scale` and clips it to the input.
fn restore_input_scale(
    det: Detection,
    scale: f64,
    width: usize,
    height: usize,
) -> Option<Detection> {
    let inv = 1.0 / scale;
    let x = (f64::from(det.rect.x) * inv).round() as i64;
    let y = (f64::from(det.rect.y) * inv).round() as i64;
    let w = ((f64::from(det.rect.width) * inv).round() as i64).min(width as i64 - x);
    let h = ((f64::from(det.rect.height) * inv).round() as i64).min(height as i64 - y);
    if w <= 0 || h <= 0 {
        return None;
    }
    let rect = Rect::new(
        i32::try_from(x).ok()?,
        i32::try_from(y).ok()?,
        i32::try_from(w).ok()?,
        i32::try_from(h).ok()?,
    );
    Some(Detection::new(det.score, rect))
}

#[cfg(test)]
mod tests {
    use super::restore_input_scale;
    use crate::candidate::detection::{Detection, Rect};

    #[test]
    fn restores_and_clips_to_the_input() {
        let det = Detection::new(1.0, Rect::new(10, 20, 30, 40));
        let out = restore_input_scale(det, 0.5, 100, 90).unwrap();
        assert_eq!(out.rect, Rect::new(20, 40, 60, 50));
        assert_eq!(out.score, 1.0);
    }
}
