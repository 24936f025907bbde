//! Compiled root filters, cached once per loaded model.
//!
//! Parsing keeps a model's weights exactly as stored. Compiling turns each
//! root filter into a contiguous, row-addressable plan for the correlation
//! kernel. The compiled set lives in a `OnceLock`, so it is built at most
//! once and shared read-only by every worker afterwards.

use std::sync::OnceLock;

use crate::feature::FEATURE_DIM;
use crate::model::RootFilter;

/// Contiguous filter weights ready for correlation.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterPlan {
    rows: usize,
    cols: usize,
    bias: f32,
    weights: Box<[f32]>,
}

impl FilterPlan {
    /// Creates a plan from row-major weights (feature index fastest).
    pub fn new(rows: usize, cols: usize, bias: f32, weights: Vec<f32>) -> Self {
        debug_assert_eq!(weights.len(), rows * cols * FEATURE_DIM);
        Self {
            rows,
            cols,
            bias,
            weights: weights.into_boxed_slice(),
        }
    }

    fn compile(filter: &RootFilter) -> Self {
        Self::new(filter.rows, filter.cols, filter.bias, filter.weights.clone())
    }

    /// Filter height in cells.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Filter width in cells.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Constant added to every response.
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Weights of filter row `y`, `cols * FEATURE_DIM` values.
    pub fn row(&self, y: usize) -> &[f32] {
        let len = self.cols * FEATURE_DIM;
        &self.weights[y * len..(y + 1) * len]
    }
}

/// Lazily compiled filter plans for a mixture.
#[derive(Debug, Default)]
pub struct FilterBank {
    plans: OnceLock<Vec<FilterPlan>>,
}

impl FilterBank {
    /// Creates an empty, uncompiled bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the plans have been compiled.
    pub fn is_cached(&self) -> bool {
        self.plans.get().is_some()
    }

    /// Returns the compiled plans, compiling them on first use.
    pub fn plans(&self, filters: &[RootFilter]) -> &[FilterPlan] {
        self.plans
            .get_or_init(|| filters.iter().map(FilterPlan::compile).collect())
    }
}

impl Clone for FilterBank {
    fn clone(&self) -> Self {
        let plans = OnceLock::new();
        if let Some(compiled) = self.plans.get() {
            let _ = plans.set(compiled.clone());
        }
        Self { plans }
    }
}
