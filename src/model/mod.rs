//! Mixture-of-root-filters object model.
//!
//! A mixture holds one root filter per component (pose or aspect variant).
//! Scoring a pyramid correlates every filter at every level and keeps, per
//! cell, the best component's score together with its index.

mod store;

use serde::{Deserialize, Serialize};

use crate::bank::FilterBank;
use crate::feature::pyramid::FeaturePyramid;
use crate::feature::{FeatureMap, FEATURE_DIM};
use crate::grid::{ComponentIndexGrid, Grid, LevelScores, ScoreGrid};
use crate::kernel::correlate;
use crate::search::map::RootSize;
use crate::util::{DetectError, DetectResult};

/// Scores a feature pyramid with a multi-component model.
///
/// Implementations are loaded once and then shared read-only across worker
/// threads; `cache_filters` is the only mutating call and runs during
/// detector construction.
pub trait MixtureModel: Send + Sync {
    /// Root footprint of each component, indexed by component.
    fn root_sizes(&self) -> Vec<RootSize>;

    /// True when the model has no components.
    fn is_empty(&self) -> bool {
        self.root_sizes().is_empty()
    }

    /// One-time precomputation invoked right after loading.
    fn cache_filters(&mut self) -> DetectResult<()> {
        Ok(())
    }

    /// Per-level best scores and winning components for `pyramid`.
    fn convolve(&self, pyramid: &FeaturePyramid) -> Vec<LevelScores>;
}

/// Root filter of one mixture component as stored on disk.
///
/// `weights` holds `rows * cols * FEATURE_DIM` values, row-major with the
/// feature index varying fastest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RootFilter {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub bias: f32,
    pub weights: Vec<f32>,
}

impl RootFilter {
    fn validate(&self, component: usize) -> DetectResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(DetectError::InvalidFilter {
                component,
                reason: "root filter must have at least one cell",
            });
        }
        let expected = self
            .rows
            .checked_mul(self.cols)
            .and_then(|v| v.checked_mul(FEATURE_DIM));
        if expected != Some(self.weights.len()) {
            return Err(DetectError::InvalidFilter {
                component,
                reason: "weight count does not match rows * cols * FEATURE_DIM",
            });
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(DetectError::InvalidFilter {
                component,
                reason: "non-finite weight",
            });
        }
        Ok(())
    }

    /// Footprint in feature cells.
    pub fn root_size(&self) -> RootSize {
        RootSize {
            rows: self.rows,
            cols: self.cols,
        }
    }
}

/// Mixture of root filters with a lazily compiled filter cache.
#[derive(Clone, Debug)]
pub struct Mixture {
    components: Vec<RootFilter>,
    bank: FilterBank,
}

impl Mixture {
    /// Builds a mixture, validating every component's geometry.
    ///
    /// An empty component list is accepted here; detector construction is
    /// where an empty model is rejected.
    pub fn new(components: Vec<RootFilter>) -> DetectResult<Self> {
        for (idx, component) in components.iter().enumerate() {
            component.validate(idx)?;
        }
        Ok(Self {
            components,
            bank: FilterBank::new(),
        })
    }

    /// The mixture's components in index order.
    pub fn components(&self) -> &[RootFilter] {
        &self.components
    }

    /// True once filters have been compiled.
    pub fn filters_cached(&self) -> bool {
        self.bank.is_cached()
    }

    fn convolve_level(&self, level: &FeatureMap) -> LevelScores {
        let plans = self.bank.plans(&self.components);
        let responses: Vec<ScoreGrid> = plans.iter().map(|plan| correlate(level, plan)).collect();

        let rows = responses.iter().map(Grid::rows).min().unwrap_or(0);
        let cols = responses.iter().map(Grid::cols).min().unwrap_or(0);
        if rows == 0 || cols == 0 {
            return LevelScores::empty();
        }

        let mut best = responses[0].cropped(rows, cols);
        let mut argmax: ComponentIndexGrid = Grid::filled(rows, cols, 0);
        for (component, response) in responses.iter().enumerate().skip(1) {
            for y in 0..rows {
                let row = response.row(y).expect("row within response");
                for (x, &score) in row[..cols].iter().enumerate() {
                    let cell = best.get_mut(y, x).expect("cell within crop");
                    if score > *cell {
                        *cell = score;
                        *argmax.get_mut(y, x).expect("cell within crop") = component;
                    }
                }
            }
        }
        LevelScores::paired(best, argmax)
    }
}

impl MixtureModel for Mixture {
    fn root_sizes(&self) -> Vec<RootSize> {
        self.components.iter().map(RootFilter::root_size).collect()
    }

    fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn cache_filters(&mut self) -> DetectResult<()> {
        self.bank.plans(&self.components);
        Ok(())
    }

    fn convolve(&self, pyramid: &FeaturePyramid) -> Vec<LevelScores> {
        pyramid
            .levels()
            .iter()
            .map(|level| self.convolve_level(level))
            .collect()
    }
}
