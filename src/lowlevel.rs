//! Individual pipeline stages for callers assembling their own detector.
//!
//! Most users should construct a [`crate::Detector`] instead. These exports
//! expose the bounding, scanning, mapping and suppression steps on their own,
//! plus the feature and filter building blocks behind the reference scorer.

pub use crate::bank::{FilterBank, FilterPlan};
pub use crate::candidate::nms::suppress_overlaps;
pub use crate::feature::{compute_features, FeatureMap, CELL_SIZE, FEATURE_DIM, ORIENTATIONS};
pub use crate::image::bounds::{bound_image, bound_scale, BoundedImage};
pub use crate::kernel::correlate;
pub use crate::search::map::{map_all, map_to_image};
pub use crate::search::scan::{is_local_maximum, scan_level, scan_levels, LocalMaximum};
