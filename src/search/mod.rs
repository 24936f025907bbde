//! Scale-space scan and back-projection of candidate cells.
//!
//! The scan module finds thresholded local maxima per pyramid level; the map
//! module turns them into pixel rectangles using the pyramid geometry and the
//! per-component root sizes.

pub(crate) mod map;
pub(crate) mod scan;
