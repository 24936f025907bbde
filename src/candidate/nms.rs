//! Greedy overlap suppression for scored detections.

use crate::candidate::detection::{sort_best_first, Detection, Rect};

/// Decides whether a candidate overlaps a reference rectangle.
///
/// Any `Fn(Rect, Rect, f32) -> bool` closure can serve as a predicate, with
/// arguments `(reference, candidate, threshold)`.
pub trait OverlapPredicate: Send + Sync {
    /// Returns true when `candidate` overlaps `reference` above `threshold`.
    fn overlaps(&self, reference: Rect, candidate: Rect, threshold: f32) -> bool;
}

impl<F> OverlapPredicate for F
where
    F: Fn(Rect, Rect, f32) -> bool + Send + Sync,
{
    fn overlaps(&self, reference: Rect, candidate: Rect, threshold: f32) -> bool {
        self(reference, candidate, threshold)
    }
}

/// Built-in overlap metrics over inclusive pixel extents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlapMetric {
    /// `intersection > area(candidate) * threshold`.
    ///
    /// Not symmetric: a small box fully inside a large reference is always
    /// suppressed.
    #[default]
    CandidateArea,
    /// `intersection > union * threshold` (intersection over union).
    Union,
}

impl OverlapPredicate for OverlapMetric {
    fn overlaps(&self, reference: Rect, candidate: Rect, threshold: f32) -> bool {
        Intersector::new(reference, threshold, *self).test(candidate)
    }
}

/// Overlap test bound to a fixed reference rectangle and threshold.
#[derive(Clone, Copy, Debug)]
pub struct Intersector {
    reference: Rect,
    threshold: f64,
    metric: OverlapMetric,
}

impl Intersector {
    /// Creates a test against `reference`.
    pub fn new(reference: Rect, threshold: f32, metric: OverlapMetric) -> Self {
        Self {
            reference,
            threshold: f64::from(threshold),
            metric,
        }
    }

    /// Returns true when `rect` overlaps the reference above the threshold.
    pub fn test(&self, rect: Rect) -> bool {
        let inter = self.reference.intersection_area(&rect);
        if inter == 0 {
            return false;
        }
        let inter = inter as f64;
        match self.metric {
            OverlapMetric::CandidateArea => inter > rect.area() as f64 * self.threshold,
            OverlapMetric::Union => {
                let union = (self.reference.area() + rect.area()) as f64 - inter;
                inter > union * self.threshold
            }
        }
    }
}

/// Suppresses overlapping detections in place, keeping the best-scoring ones.
///
/// Detections are stably sorted by descending score. Each surviving
/// detection, in order, removes every later detection the predicate reports
/// as overlapping it. The result is score-descending and no survivor
/// overlaps an earlier survivor above `threshold`.
pub fn suppress_overlaps<P>(detections: &mut Vec<Detection>, threshold: f32, predicate: &P)
where
    P: OverlapPredicate + ?Sized,
{
    sort_best_first(detections);

    let mut i = 0;
    while i < detections.len() {
        let reference = detections[i].rect;
        let mut write = i + 1;
        for read in i + 1..detections.len() {
            let candidate = detections[read];
            if !predicate.overlaps(reference, candidate.rect, threshold) {
                detections[write] = candidate;
                write += 1;
            }
        }
        detections.truncate(write);
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{suppress_overlaps, Intersector, OverlapMetric};
    use crate::candidate::detection::{Detection, Rect};

    #[test]
    fn candidate_area_metric_suppresses_contained_boxes() {
        let big = Rect::new(0, 0, 100, 100);
        let small = Rect::new(10, 10, 10, 10);
        assert!(Intersector::new(big, 0.5, OverlapMetric::CandidateArea).test(small));
        assert!(!Intersector::new(big, 0.5, OverlapMetric::Union).test(small));
    }

    #[test]
    fn disjoint_boxes_never_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 10, 10);
        assert!(!Intersector::new(a, 0.0, OverlapMetric::CandidateArea).test(b));
        assert!(!Intersector::new(a, 0.0, OverlapMetric::Union).test(b));
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 0, 10, 10);
        // 50 shared pixels out of 100.
        assert!(!Intersector::new(a, 0.5, OverlapMetric::CandidateArea).test(b));
        assert!(Intersector::new(a, 0.49, OverlapMetric::CandidateArea).test(b));
    }

    #[test]
    fn keeps_best_of_overlapping_pair() {
        let mut dets = vec![
            Detection::new(0.5, Rect::new(5, 5, 100, 100)),
            Detection::new(0.9, Rect::new(0, 0, 100, 100)),
        ];
        suppress_overlaps(&mut dets, 0.2, &OverlapMetric::CandidateArea);
        assert_eq!(dets, vec![Detection::new(0.9, Rect::new(0, 0, 100, 100))]);
    }

    #[test]
    fn suppressed_boxes_do_not_suppress_others() {
        // b overlaps a and c; a does not overlap c. b is removed by a, so c survives.
        let mut dets = vec![
            Detection::new(0.9, Rect::new(0, 0, 10, 10)),
            Detection::new(0.8, Rect::new(4, 0, 10, 10)),
            Detection::new(0.7, Rect::new(10, 0, 10, 10)),
        ];
        suppress_overlaps(&mut dets, 0.2, &OverlapMetric::Union);
        let xs: Vec<i32> = dets.iter().map(|d| d.rect.x).collect();
        assert_eq!(xs, vec![0, 10]);
    }

    #[test]
    fn closures_act_as_predicates() {
        let same_x = |r: Rect, c: Rect, _t: f32| r.x == c.x;
        let mut dets = vec![
            Detection::new(0.3, Rect::new(1, 50, 5, 5)),
            Detection::new(0.6, Rect::new(1, 0, 5, 5)),
            Detection::new(0.4, Rect::new(2, 0, 5, 5)),
        ];
        suppress_overlaps(&mut dets, 0.5, &same_x);
        let scores: Vec<f32> = dets.iter().map(|d| d.score).collect();
        assert_eq!(scores, vec![0.6, 0.4]);
    }
}
